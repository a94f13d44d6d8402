/// Maps a host key name to the module's dense key code.
///
/// Key names follow the DOM `KeyboardEvent.key` convention. Letters map
/// case-insensitively; shifted digit symbols share their digit's code on a
/// US layout (`!` is `1`, `)` is `0`). Anything else is not forwarded.
pub fn key_code(key: &str) -> Option<u8> {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return char_code(c);
    }

    let code = match key {
        "ArrowRight" => 36,
        "ArrowLeft" => 37,
        "ArrowDown" => 38,
        "ArrowUp" => 39,
        "Escape" => 40,
        "Enter" => 41,
        "Backspace" => 43,
        "Delete" => 44,
        _ => return None,
    };
    Some(code)
}

fn char_code(c: char) -> Option<u8> {
    let code = match c {
        'a'..='z' => c as u8 - b'a',
        'A'..='Z' => c as u8 - b'A',
        '0'..='9' => 26 + (c as u8 - b'0'),
        ')' => 26,
        '!' => 27,
        '@' => 28,
        '#' => 29,
        '$' => 30,
        '%' => 31,
        '^' => 32,
        '&' => 33,
        '*' => 34,
        '(' => 35,
        ' ' => 42,
        _ => return None,
    };
    Some(code)
}
