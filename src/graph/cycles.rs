#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Finds a cycle in a directed graph given as an adjacency list.
///
/// Uses an iterative depth-first traversal with white/gray/black marking. A
/// back-edge to a gray node closes a cycle; the returned vector holds the
/// cycle's nodes in edge order, starting at the node the back-edge points to.
pub fn find_cycle(adjacency: &[Vec<usize>]) -> Option<Vec<usize>> {
    let mut color = vec![Color::White; adjacency.len()];
    // (node, index of the next outgoing edge to explore)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for start in 0..adjacency.len() {
        if color[start] != Color::White {
            continue;
        }
        color[start] = Color::Gray;
        stack.push((start, 0));

        while let Some(top) = stack.last_mut() {
            let (node, next) = *top;
            let Some(&target) = adjacency[node].get(next) else {
                color[node] = Color::Black;
                stack.pop();
                continue;
            };
            top.1 += 1;

            match color.get(target).copied() {
                Some(Color::White) => {
                    color[target] = Color::Gray;
                    stack.push((target, 0));
                }
                Some(Color::Gray) => {
                    let position = stack.iter().position(|(n, _)| *n == target)?;
                    return Some(stack[position..].iter().map(|(n, _)| *n).collect());
                }
                // Finished nodes and dangling targets close no cycle.
                Some(Color::Black) | None => {}
            }
        }
    }

    None
}
