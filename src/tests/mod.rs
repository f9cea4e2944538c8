//! Tests for the Context.IO Lite client.

#[cfg(test)]
mod client_tests;


#[cfg(test)]
mod services_tests;
