//! Text clean-up for EDM macro strings and help popups

/// Number of lines the help display can show
pub const HELP_LINES: usize = 6;
/// Maximum characters per help line
pub const HELP_WIDTH: usize = 80;

/// Make a string safe inside an EDM `symbols` macro list
pub fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' | '{' | '}' | '"' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => {}
            ',' => out.push(';'),
            _ => out.push(c),
        }
    }
    out
}

/// Word-wrap `"<name>: <description>"` into the help display lines.
/// Text that does not fit in [`HELP_LINES`] lines is dropped.
pub fn help_lines(name: &str, description: &str) -> [String; HELP_LINES] {
    let mut lines: [String; HELP_LINES] = Default::default();
    lines[0] = format!("{}: ", name);
    let mut i = 0;
    for word in description.split_whitespace() {
        if lines[i].chars().count() + word.chars().count() > HELP_WIDTH {
            i += 1;
            if i >= HELP_LINES {
                break;
            }
        }
        lines[i].push_str(word);
        lines[i].push(' ');
    }
    lines
}

/// Help lines as macro values, empty lines as `''`
pub fn help_symbols(name: &str, description: &str) -> [String; HELP_LINES] {
    help_lines(name, description).map(|line| {
        if line.is_empty() {
            "''".to_string()
        } else {
            quote_string(&line)
        }
    })
}

/// EDM files are plain ASCII
pub fn ascii_lossy(s: &str) -> String {
    s.chars().map(|c| if c.is_ascii() { c } else { '?' }).collect()
}
