//! Common diagnostic strings shared by the engine and its tests.

/// Prefix of the instance string form: `instance of [<classname>]`.
pub const INSTANCE_OF_PREFIX: &str = "instance of";

/// Error reason: first argument must be a class.
pub const ERR_EXPECTED_CLASS: &str = "expected a class as first argument";

/// Error reason: method name argument must be a string.
pub const ERR_EXPECTED_METHOD_NAME: &str = "expected a method name string";

/// Error reason: candidate must be a class.
pub const ERR_EXPECTED_CANDIDATE: &str = "expected a class candidate";

/// Error reason: receiver must be an instance.
pub const ERR_EXPECTED_INSTANCE: &str = "receiver must be an instance";

/// Render the string form of an instance of `classname`.
pub fn instance_of(classname: &str) -> String {
    format!("{} [{}]", INSTANCE_OF_PREFIX, classname)
}
