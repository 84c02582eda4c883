pub mod fake_backend;
pub mod prepare_env;
