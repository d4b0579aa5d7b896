//! ASCII circle drawing

/// Clear the terminal and move the cursor home
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Draw the top `fill` fraction of a circle of dots.
///
/// Rows step by two characters of height so the circle looks round in a
/// terminal; a full circle of diameter `d` has `d` rows.
pub fn circle(diameter: usize, fill: f64) -> String {
    let mut out = String::new();
    let height = (diameter * 2) as f64 * fill;

    let mut row = 0usize;
    while (row as f64) < height {
        let width = if row < diameter {
            row + 1
        } else {
            (2 * diameter).saturating_sub(row + 1)
        };
        let margin = " ".repeat(diameter.saturating_sub(width) / 2);

        out.push_str(&margin);
        out.push_str(&".".repeat(width));
        out.push_str(&margin);
        out.push('\n');
        row += 2;
    }

    out
}
