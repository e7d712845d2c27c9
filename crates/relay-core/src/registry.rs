use crate::config::Environment;

/// The ordered list of configured deployment environments.
///
/// Registry order is significant: operations iterate and report in this
/// order, and the first environment of a project is its entry environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvRegistry {
    envs: Vec<Environment>,
}

impl EnvRegistry {
    pub fn new(envs: Vec<Environment>) -> Self {
        Self { envs }
    }

    pub fn all(&self) -> &[Environment] {
        &self.envs
    }

    pub fn is_empty(&self) -> bool {
        self.envs.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.envs.iter().map(|e| e.name.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Environment> {
        self.envs.iter().find(|e| e.name == name)
    }

    /// Check that every requested name is a configured environment.
    ///
    /// # Errors
    ///
    /// [`crate::Error::InvalidEnvs`] listing every unknown name together with
    /// the valid options.
    pub fn validate<S: AsRef<str>>(&self, requested: &[S]) -> crate::Result<()> {
        let invalid: Vec<String> = requested
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| self.get(name).is_none())
            .map(str::to_owned)
            .collect();

        if invalid.is_empty() {
            Ok(())
        } else {
            Err(crate::Error::InvalidEnvs {
                invalid,
                valid: self.names(),
            })
        }
    }

    /// Environments whose name is in `requested`, in registry order.
    ///
    /// Unknown names are silently skipped; call [`validate`](Self::validate)
    /// first when they must be rejected.
    pub fn select<S: AsRef<str>>(&self, requested: &[S]) -> Vec<Environment> {
        self.envs
            .iter()
            .filter(|e| requested.iter().any(|r| r.as_ref() == e.name))
            .cloned()
            .collect()
    }

    /// Validate and select `requested`; an empty request means every
    /// configured environment.
    pub fn resolve<S: AsRef<str>>(&self, requested: &[S]) -> crate::Result<Vec<Environment>> {
        if requested.is_empty() {
            return Ok(self.envs.clone());
        }
        self.validate(requested)?;
        Ok(self.select(requested))
    }
}
