// Text rendering of screens
use crate::domain::grid::{free_cells, BoxSize, GridSize, PALETTE};
use crate::domain::view::{GridBox, View};
use std::fmt::Write;

const CELL_WIDTH: usize = 5;

pub fn home(views: &[View]) -> String {
    if views.is_empty() {
        return "No views yet. Create one with: new <name>".to_string();
    }

    let mut out = String::from("Views (most recent first):\n");
    for (n, view) in views.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {:<24} {:>2} box(es)  updated {}",
            n + 1,
            view.name,
            view.boxes.len(),
            view.updated_at.format("%Y-%m-%d %H:%M")
        );
    }
    out.trim_end().to_string()
}

pub fn menu(view: &View) -> String {
    let source = view.excel_name.as_deref().unwrap_or("no data imported");
    format!(
        "{} ({})\n  {} box(es), source: {}\n  edit | present | export | rename <name> | delete | back",
        view.name,
        view.id,
        view.boxes.len(),
        source
    )
}

/// What a box displays: the bound cell value, or its title when unbound.
pub fn box_label(view: &View, b: &GridBox) -> String {
    match (&b.variable, view.bound_value(b)) {
        (Some(_), Some(value)) => format!("{}: {}", b.title, value),
        (Some(column), None) => format!("{}: <no value for {}>", b.title, column),
        (None, _) => b.title.clone(),
    }
}

pub fn grid(view: &View, grid: GridSize, selected: Option<usize>, pending: Option<BoxSize>) -> String {
    let mut out = String::new();
    let rule = format!("+{}\n", "-".repeat((CELL_WIDTH + 1) * grid.width as usize - 1) + "+");

    out.push_str(&rule);
    for row in 0..grid.height {
        out.push('|');
        for col in 0..grid.width {
            let index = row * grid.width + col;
            let covering = view
                .boxes
                .iter()
                .position(|b| b.footprint().contains_cell(col, row));
            let label = match covering {
                Some(i) if Some(i) == selected => format!("*{}", i + 1),
                Some(i) => format!("#{}", i + 1),
                None => format!("{:02}", index),
            };
            let _ = write!(out, "{:^width$}|", label, width = CELL_WIDTH);
        }
        out.push('\n');
    }
    out.push_str(&rule);

    let _ = writeln!(
        out,
        "{} free cell(s), pending size: {}",
        free_cells(view.footprints(), grid),
        pending.map(|s| s.to_string()).unwrap_or_else(|| "none".to_string())
    );

    for (i, b) in view.boxes.iter().enumerate() {
        let _ = writeln!(
            out,
            "  #{} {}x{} at ({},{})  {}",
            i + 1,
            b.w,
            b.h,
            b.x,
            b.y,
            box_label(view, b)
        );
    }

    let palette: Vec<String> = PALETTE.iter().map(BoxSize::to_string).collect();
    let _ = write!(out, "sizes: {}", palette.join(" "));
    out
}

pub fn box_editor(view: &View, index: usize) -> String {
    let Some(b) = view.boxes.get(index) else {
        return format!("no box #{}", index + 1);
    };

    let columns = if view.headers.is_empty() {
        "import a spreadsheet to bind columns".to_string()
    } else {
        view.headers.join(", ")
    };

    format!(
        "Box #{} ({}x{} at {},{})\n  title: {}\n  shows: {}\n  bound to: {}\n  bg: {}  fg: {}  font: {}\n  columns: {}",
        index + 1,
        b.w,
        b.h,
        b.x,
        b.y,
        b.title,
        box_label(view, b),
        b.variable.as_deref().unwrap_or("nothing"),
        b.bg_color,
        b.text_color,
        b.font_size,
        columns
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::Footprint;
    use crate::domain::view::{BoxTemplate, BoxUpdate, CellValue, FontPolicy, Record};

    fn view_with_bound_box() -> View {
        let mut view = View::new("Sales").unwrap();
        let mut row = Record::new();
        row.insert("Revenue".to_string(), CellValue::Number(1200.0));
        row.insert("Region".to_string(), CellValue::Text("North".to_string()));
        view.replace_data(
            vec!["Revenue".to_string(), "Region".to_string()],
            vec![row],
            Some("sales.xlsx".to_string()),
        );
        view.place_box(
            Footprint::new(0, 0, 2, 2),
            &BoxTemplate::default(),
            GridSize::STANDARD,
        )
        .unwrap();
        view.apply(
            0,
            BoxUpdate::SetVariable(Some("Revenue".to_string())),
            &FontPolicy::default(),
        )
        .unwrap();
        view
    }

    #[test]
    fn test_bound_box_shows_value_not_header() {
        let view = view_with_bound_box();
        let label = box_label(&view, &view.boxes[0]);
        assert_eq!(label, "Title: 1200");
        assert!(!label.contains("Revenue"));
    }

    #[test]
    fn test_grid_marks_covered_cells() {
        let view = view_with_bound_box();
        let text = grid(&view, GridSize::STANDARD, Some(0), None);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[1].starts_with("| *1  | *1  | 02  |"));
        assert!(lines[3].contains("12"));
        assert!(text.contains("20 free cell(s), pending size: none"));
        assert!(text.contains("#1 2x2 at (0,0)  Title: 1200"));
    }

    #[test]
    fn test_home_lists_views() {
        assert!(home(&[]).starts_with("No views yet"));
        let view = view_with_bound_box();
        let text = home(std::slice::from_ref(&view));
        assert!(text.contains("  1. Sales"));
        assert!(text.contains(" 1 box(es)"));
    }

    #[test]
    fn test_box_editor_lists_columns() {
        let view = view_with_bound_box();
        let text = box_editor(&view, 0);
        assert!(text.contains("bound to: Revenue"));
        assert!(text.contains("columns: Revenue, Region"));
        assert_eq!(box_editor(&view, 4), "no box #5");
    }
}
