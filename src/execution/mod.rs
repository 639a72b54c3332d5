pub mod execution_engine;
pub mod executor_context;
pub mod executor_factory;
pub mod executors;
pub mod expressions;
pub mod plans;

pub use execution_engine::ExecutionEngine;
pub use executor_context::ExecutorContext;
pub use executor_factory::ExecutorFactory;
pub use executors::Executor;
