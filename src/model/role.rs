use std::fmt;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Admin = 1,
    Director = 2,
    Manager = 3,
    Supervisor = 4,
    Worker = 5,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Director),
            3 => Some(Role::Manager),
            4 => Some(Role::Supervisor),
            5 => Some(Role::Worker),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Director => "Director",
            Role::Manager => "Manager",
            Role::Supervisor => "Supervisor",
            Role::Worker => "Worker",
        }
    }

    /// Roles that sit somewhere in the approval chain.
    pub fn is_approver(&self) -> bool {
        matches!(self, Role::Supervisor | Role::Manager | Role::Director)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
