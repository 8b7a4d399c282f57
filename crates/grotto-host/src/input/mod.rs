pub mod stdin;

pub use stdin::StdinInput;
