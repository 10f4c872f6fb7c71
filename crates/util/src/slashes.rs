/// Removes backslash escaping the way WordPress unslashes request data.
///
/// `\x` becomes `x` for any character (so `\\` becomes `\`), `\0` becomes
/// a NUL character, and a lone trailing backslash is dropped.
pub fn strip_slashes(input: &str) -> String {
    if !input.contains('\\') {
        return input.to_string();
    }
    let mut output = String::with_capacity(input.len());
    let mut characters = input.chars();
    while let Some(character) = characters.next() {
        if character != '\\' {
            output.push(character);
            continue;
        }
        match characters.next() {
            Some('0') => output.push('\0'),
            Some(escaped) => output.push(escaped),
            None => {}
        }
    }
    output
}
