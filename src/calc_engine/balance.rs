/// Returns `true` when every `)` closes an earlier `(` and nothing is left open.
pub fn is_balanced(expr: &str) -> bool {
    let mut depth: i64 = 0;

    for c in expr.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }

    depth == 0
}
