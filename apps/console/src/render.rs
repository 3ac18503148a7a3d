use client_core::TableRow;

const HEADERS: [&str; 3] = ["Event", "Start", "End"];

/// Plain-text table. Hidden rows are skipped but visible rows keep their
/// index, since commands address rows by it.
pub fn render_table(rows: &[TableRow]) -> String {
    let visible: Vec<(usize, &TableRow)> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.is_visible())
        .collect();

    let cells: Vec<[String; 3]> = visible
        .iter()
        .map(|(_, row)| {
            let [name, start, end] = row.cells();
            if row.is_editing() {
                [format!("[{name}]"), format!("[{start}]"), format!("[{end}]")]
            } else {
                [name.to_string(), start.to_string(), end.to_string()]
            }
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = format!(
        "{:>3}  {:<w0$}  {:<w1$}  {:<w2$}  Actions\n",
        "#",
        HEADERS[0],
        HEADERS[1],
        HEADERS[2],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
    );
    for ((index, row), cells) in visible.iter().zip(&cells) {
        let actions = row
            .actions()
            .iter()
            .map(|action| format!("[{}]", action.label()))
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&format!(
            "{:>3}  {:<w0$}  {:<w1$}  {:<w2$}  {}\n",
            index,
            cells[0],
            cells[1],
            cells[2],
            actions,
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
        ));
    }
    if visible.is_empty() {
        out.push_str("     (no events; type `new` to add one)\n");
    }
    out
}
