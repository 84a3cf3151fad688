/// Who is logged in, if anyone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    username: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.username.is_some()
    }

    pub fn log_in(&mut self, username: impl Into<String>) {
        self.username = Some(username.into());
    }

    pub fn log_out(&mut self) {
        self.username = None;
    }
}
