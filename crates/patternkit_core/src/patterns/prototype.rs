//! Prototype copies with explicit shallow and deep contracts.
//!
//! # Invariants
//! - `shallow_clone` copies owned fields and shares the address cell.
//! - `deep_clone` copies owned fields and allocates a new address cell.

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub line: String,
}

impl Address {
    pub fn new(line: impl Into<String>) -> Self {
        Self { line: line.into() }
    }
}

/// Plain prototype: all fields are owned, so a clone is already independent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrototypeEmployee {
    pub name: String,
    pub department: String,
}

impl PrototypeEmployee {
    pub fn new(name: impl Into<String>, department: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            department: department.into(),
        }
    }

    pub fn get_clone(&self) -> Self {
        self.clone()
    }
}

#[derive(Debug)]
pub struct ShallowEmployee {
    pub name: String,
    pub department: String,
    pub address: Rc<RefCell<Address>>,
}

impl ShallowEmployee {
    pub fn new(name: impl Into<String>, department: impl Into<String>, address: Address) -> Self {
        Self {
            name: name.into(),
            department: department.into(),
            address: Rc::new(RefCell::new(address)),
        }
    }

    pub fn shallow_clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            department: self.department.clone(),
            address: Rc::clone(&self.address),
        }
    }

    pub fn address_line(&self) -> String {
        self.address.borrow().line.clone()
    }
}

#[derive(Debug)]
pub struct DeepEmployee {
    pub name: String,
    pub department: String,
    pub address: Rc<RefCell<Address>>,
}

impl DeepEmployee {
    pub fn new(name: impl Into<String>, department: impl Into<String>, address: Address) -> Self {
        Self {
            name: name.into(),
            department: department.into(),
            address: Rc::new(RefCell::new(address)),
        }
    }

    pub fn deep_clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            department: self.department.clone(),
            address: Rc::new(RefCell::new(self.address.borrow().clone())),
        }
    }

    pub fn address_line(&self) -> String {
        self.address.borrow().line.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::{Address, DeepEmployee, PrototypeEmployee, ShallowEmployee};

    #[test]
    fn prototype_clone_is_independent() {
        let original = PrototypeEmployee::new("Anurag", "IT");
        let mut copy = original.get_clone();
        copy.name = "Pranaya".to_string();

        assert_eq!(original.name, "Anurag");
        assert_eq!(copy.department, "IT");
    }

    #[test]
    fn shallow_clone_shares_address() {
        let original = ShallowEmployee::new("Anurag", "IT", Address::new("BBSR"));
        let mut copy = original.shallow_clone();
        copy.name = "Pranaya".to_string();
        copy.address.borrow_mut().line = "Mumbai".to_string();

        assert_eq!(original.name, "Anurag");
        assert_eq!(original.address_line(), "Mumbai");
    }

    #[test]
    fn deep_clone_owns_its_address() {
        let original = DeepEmployee::new("Anurag", "IT", Address::new("BBSR"));
        let copy = original.deep_clone();
        copy.address.borrow_mut().line = "Mumbai".to_string();

        assert_eq!(original.address_line(), "BBSR");
        assert_eq!(copy.address_line(), "Mumbai");
    }
}
