pub mod index;
pub mod swagger_main;
pub mod todo;

#[cfg(test)]
pub mod test_util;
