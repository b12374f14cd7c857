/// A parsed record that renders as exactly one line of generated Rust.
pub trait ToRegistration {
    fn to_registration(&self) -> String;
}
