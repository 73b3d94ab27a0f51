/// Builds the reply for a request: `"Hello, {name}!"`.
///
/// Accepts any text, including the empty string.
///
/// ```
/// use greetsrv::greet;
///
/// assert_eq!(greet("World"), "Hello, World!");
/// assert_eq!(greet(""), "Hello, !");
/// ```
pub fn greet(name: &str) -> String {
    format!("Hello, {name}!")
}
