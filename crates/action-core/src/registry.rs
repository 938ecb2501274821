//! Executor registry for dispatching actions by type.

use crate::{ActionExecutor, WorkflowAction};

/// Registry of action executors, keyed by action type.
pub struct ActionRegistry {
    executors: Vec<Box<dyn ActionExecutor>>,
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            executors: Vec::new(),
        }
    }

    /// Register an executor, replacing any executor for the same action type.
    pub fn register(&mut self, executor: Box<dyn ActionExecutor>) {
        let action_type = executor.info().action_type;
        self.executors
            .retain(|e| e.info().action_type != action_type);
        self.executors.push(executor);
    }

    /// Get all registered executors.
    pub fn executors(&self) -> &[Box<dyn ActionExecutor>] {
        &self.executors
    }

    /// Registered action types, in registration order.
    pub fn types(&self) -> Vec<&'static str> {
        self.executors.iter().map(|e| e.info().action_type).collect()
    }

    /// Get the executor for an action type.
    pub fn get(&self, action_type: &str) -> Option<&dyn ActionExecutor> {
        self.executors
            .iter()
            .find(|e| e.info().action_type == action_type)
            .map(|e| e.as_ref())
    }

    /// Get the executor declared by a workflow action.
    pub fn for_action(&self, action: &WorkflowAction) -> Option<&dyn ActionExecutor> {
        self.get(&action.action_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::NoopExecutor;

    #[test]
    fn test_register_and_get() {
        let mut registry = ActionRegistry::new();
        registry.register(Box::new(NoopExecutor::new("a")));
        registry.register(Box::new(NoopExecutor::new("b")));

        assert_eq!(registry.types(), vec!["a", "b"]);
        assert!(registry.get("a").is_some());
        assert!(registry.get("c").is_none());

        let action = WorkflowAction::new("wf@x", "x", "b", "<b/>");
        assert_eq!(
            registry.for_action(&action).map(|e| e.info().action_type),
            Some("b")
        );
    }

    #[test]
    fn test_register_replaces_same_type() {
        let mut registry = ActionRegistry::new();
        registry.register(Box::new(NoopExecutor::new("a")));
        registry.register(Box::new(NoopExecutor::new("b")));
        registry.register(Box::new(NoopExecutor::new("a")));

        assert_eq!(registry.executors().len(), 2);
        assert_eq!(registry.types(), vec!["b", "a"]);
    }
}
