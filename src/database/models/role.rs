use serde::{Deserialize, Serialize};

use super::macros::string_enum;

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
    #[serde(rename_all = "lowercase")]
    pub enum Role {
        #[default]
        Employee => "employee",
        Manager => "manager",
        Admin => "admin",
    }
}
