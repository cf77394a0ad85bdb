pub mod std_ops;
