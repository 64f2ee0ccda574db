//! Bean fixtures shared by the mapper's unit tests.

use std::collections::BTreeSet;

use attrbind_core::Value;

use crate::bean::{Bean, BeanSchema};
use crate::error::PropertyError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Person {
    pub dn: String,
    pub cn: String,
    pub uid_number: i32,
    pub mail: Vec<String>,
    pub groups: BTreeSet<String>,
    pub photo: Option<Vec<u8>>,
    pub active: bool,
    pub manager: Option<String>,
}

impl Person {
    pub(crate) fn alice() -> Self {
        Self {
            dn: "uid=alice,ou=people,dc=example,dc=org".to_string(),
            cn: "Alice".to_string(),
            uid_number: 1001,
            mail: vec!["alice@example.org".to_string(), "a@example.org".to_string()],
            groups: ["admins", "staff"].into_iter().map(String::from).collect(),
            photo: Some(vec![0xff, 0xd8, 0x00]),
            active: true,
            manager: None,
        }
    }
}

fn wrong(expected: &'static str, found: &Value) -> PropertyError {
    PropertyError::WrongShape {
        expected,
        found: found.kind_name(),
    }
}

fn string(value: Value) -> Result<String, PropertyError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(wrong("String", &other)),
    }
}

fn optional_string(value: Value) -> Result<Option<String>, PropertyError> {
    match value {
        Value::Null => Ok(None),
        other => string(other).map(Some),
    }
}

fn strings(value: Value) -> Result<Vec<String>, PropertyError> {
    let items: Vec<Value> = match value {
        Value::List(items) => items,
        Value::Set(items) => items.into_iter().collect(),
        other => return Err(wrong("list", &other)),
    };
    items.into_iter().map(string).collect()
}

fn text_list(items: &[String]) -> Value {
    Value::List(items.iter().cloned().map(Value::String).collect())
}

impl Bean for Person {
    fn schema() -> BeanSchema {
        BeanSchema::new("Person")
            .dn("dn")
            .property("cn", "String")
            .attribute("uid_number", "uidNumber", "i32")
            .property("mail", "List<String>")
            .attribute("groups", "memberOf", "Set<String>")
            .attribute("photo", "jpegPhoto", "u8[]")
            .property("active", "bool")
            .property("manager", "String")
    }

    fn get(&self, property: &str) -> Option<Value> {
        Some(match property {
            "dn" => Value::String(self.dn.clone()),
            "cn" => Value::String(self.cn.clone()),
            "uid_number" => Value::Int(self.uid_number),
            "mail" => text_list(&self.mail),
            "groups" => Value::Set(self.groups.iter().cloned().map(Value::String).collect()),
            "photo" => self.photo.clone().map_or(Value::Null, Value::Bytes),
            "active" => Value::Bool(self.active),
            "manager" => self.manager.clone().map_or(Value::Null, Value::String),
            _ => return None,
        })
    }

    fn set(&mut self, property: &str, value: Value) -> Result<(), PropertyError> {
        match property {
            "dn" => self.dn = string(value)?,
            "cn" => self.cn = optional_string(value)?.unwrap_or_default(),
            "uid_number" => match value {
                Value::Int(n) => self.uid_number = n,
                other => return Err(wrong("i32", &other)),
            },
            "mail" => self.mail = strings(value)?,
            "groups" => self.groups = strings(value)?.into_iter().collect(),
            "photo" => match value {
                Value::Null => self.photo = None,
                Value::Bytes(bytes) => self.photo = Some(bytes),
                other => return Err(wrong("u8[]", &other)),
            },
            "active" => match value {
                Value::Bool(b) => self.active = b,
                other => return Err(wrong("bool", &other)),
            },
            "manager" => self.manager = optional_string(value)?,
            _ => return Err(PropertyError::Unknown),
        }
        Ok(())
    }
}
