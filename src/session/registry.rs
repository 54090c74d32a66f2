use anyhow::{bail, Result};

use super::stopwatch::NO_TASK_LABEL;

/// Ordered list of task names offered for selection.
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    names: Vec<String>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a trimmed task name. Returns `false` if it was already known.
    pub fn add(&mut self, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() {
            bail!("Task name can't be empty");
        }
        if name == NO_TASK_LABEL {
            bail!("{NO_TASK_LABEL:?} is reserved and can't be used as a task name");
        }
        if self.contains(name) {
            return Ok(false);
        }
        self.names.push(name.to_owned());
        Ok(true)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|v| v == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use super::TaskRegistry;
    use crate::session::stopwatch::NO_TASK_LABEL;

    #[test]
    fn keeps_insertion_order_without_duplicates() -> Result<()> {
        let mut registry = TaskRegistry::new();
        assert!(registry.add("Write code")?);
        assert!(registry.add("Review")?);
        assert!(!registry.add("  Write code ")?);
        assert_eq!(registry.names(), ["Write code", "Review"]);
        Ok(())
    }

    #[test]
    fn rejects_empty_and_reserved_names() {
        let mut registry = TaskRegistry::new();
        assert!(registry.add("").is_err());
        assert!(registry.add("   ").is_err());
        assert!(registry.add(NO_TASK_LABEL).is_err());
        assert!(registry.names().is_empty());
    }
}
