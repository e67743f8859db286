/// Result record of compiling one environment.
#[derive(Debug, Clone, Default)]
pub struct Compilation {
    pub environment: String,
    pub is_prod: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Compilation {
    pub fn new(environment: impl Into<String>, is_prod: bool) -> Self {
        Self {
            environment: environment.into(),
            is_prod,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn push_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
