//! Business logic for the todo list, organized as ports and adapters. Driving ports are what the
//! HTTP layer calls into; driven ports are what the domain calls out to (storage).

pub mod todo;

#[cfg(test)]
mod test_util;
