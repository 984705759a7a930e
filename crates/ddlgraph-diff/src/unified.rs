/// Lines of unchanged context around each hunk.
pub const DEFAULT_CONTEXT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Equal,
    Delete,
    Insert,
}

/// Line-based unified diff of `left` against `right`.
///
/// Returns an empty string when both texts have the same lines.
pub fn unified_diff(
    left_label: &str,
    right_label: &str,
    left: &str,
    right: &str,
    context: usize,
) -> String {
    let left_lines: Vec<&str> = left.lines().collect();
    let right_lines: Vec<&str> = right.lines().collect();
    let ops = edit_script(&left_lines, &right_lines);

    let changes: Vec<usize> = ops
        .iter()
        .enumerate()
        .filter(|(_, (op, _))| *op != Op::Equal)
        .map(|(position, _)| position)
        .collect();
    if changes.is_empty() {
        return String::new();
    }

    let mut out = format!("--- {left_label}\n+++ {right_label}\n");
    for (first, last) in group_changes(&changes, context) {
        let start = first.saturating_sub(context);
        let end = (last + context + 1).min(ops.len());
        out.push_str(&render_hunk(&ops, start, end));
    }
    out
}

/// Group change positions whose gap of unchanged lines fits in two contexts.
fn group_changes(changes: &[usize], context: usize) -> Vec<(usize, usize)> {
    let mut groups: Vec<(usize, usize)> = Vec::new();
    for &position in changes {
        match groups.last_mut() {
            Some((_, last)) if position - *last <= 2 * context + 1 => *last = position,
            _ => groups.push((position, position)),
        }
    }
    groups
}

fn render_hunk(ops: &[(Op, &str)], start: usize, end: usize) -> String {
    let consumed = |range: &[(Op, &str)], skip: Op| range.iter().filter(|(op, _)| *op != skip).count();
    let left_before = consumed(&ops[..start], Op::Insert);
    let right_before = consumed(&ops[..start], Op::Delete);
    let left_count = consumed(&ops[start..end], Op::Insert);
    let right_count = consumed(&ops[start..end], Op::Delete);

    let mut out = format!(
        "@@ -{} +{} @@\n",
        range_label(left_before, left_count),
        range_label(right_before, right_count)
    );
    for (op, line) in &ops[start..end] {
        let marker = match op {
            Op::Equal => ' ',
            Op::Delete => '-',
            Op::Insert => '+',
        };
        out.push(marker);
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// `start,count` with the usual convention for empty ranges.
fn range_label(before: usize, count: usize) -> String {
    match count {
        0 => format!("{before},0"),
        1 => format!("{}", before + 1),
        _ => format!("{},{count}", before + 1),
    }
}

/// Edit script of `left` into `right`. The common prefix and suffix are
/// matched directly; only the differing middle goes through the LCS table.
fn edit_script<'a>(left: &[&'a str], right: &[&'a str]) -> Vec<(Op, &'a str)> {
    let prefix = left
        .iter()
        .zip(right)
        .take_while(|(l, r)| l == r)
        .count();
    let suffix = left[prefix..]
        .iter()
        .rev()
        .zip(right[prefix..].iter().rev())
        .take_while(|(l, r)| l == r)
        .count();

    let mut ops = Vec::with_capacity(left.len().max(right.len()));
    ops.extend(left[..prefix].iter().map(|line| (Op::Equal, *line)));
    ops.extend(lcs_script(
        &left[prefix..left.len() - suffix],
        &right[prefix..right.len() - suffix],
    ));
    ops.extend(left[left.len() - suffix..].iter().map(|line| (Op::Equal, *line)));
    ops
}

/// Longest-common-subsequence edit script.
fn lcs_script<'a>(left: &[&'a str], right: &[&'a str]) -> Vec<(Op, &'a str)> {
    let rows = left.len();
    let cols = right.len();
    let mut lcs = vec![vec![0usize; cols + 1]; rows + 1];
    for i in (0..rows).rev() {
        for j in (0..cols).rev() {
            lcs[i][j] = if left[i] == right[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut ops = Vec::with_capacity(rows + cols);
    let (mut i, mut j) = (0, 0);
    while i < rows && j < cols {
        if left[i] == right[j] {
            ops.push((Op::Equal, left[i]));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            ops.push((Op::Delete, left[i]));
            i += 1;
        } else {
            ops.push((Op::Insert, right[j]));
            j += 1;
        }
    }
    ops.extend(left[i..].iter().map(|line| (Op::Delete, *line)));
    ops.extend(right[j..].iter().map(|line| (Op::Insert, *line)));
    ops
}
