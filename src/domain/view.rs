// View domain model - a saved dashboard layout and its imported data
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::color::Color;
use super::grid::{can_place, Footprint, GridSize, PlacementError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(Uuid);

impl ViewId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ViewId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ViewId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            // Whole numbers print without a trailing ".0"
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// One imported data row keyed by header name.
pub type Record = BTreeMap<String, CellValue>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("no box #{}", .0 + 1)]
    NoSuchBox(usize),

    #[error("'{0}' is not a column of the imported data")]
    UnknownHeader(String),

    #[error("'{0}' is not a palette color or #rrggbb value")]
    InvalidColor(String),

    #[error("title must not be blank")]
    BlankTitle,

    #[error("view name must not be blank")]
    BlankName,
}

/// Font size bounds and step used by the box editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontPolicy {
    pub step: u32,
    pub min: u32,
    pub max: u32,
}

impl FontPolicy {
    pub fn clamp(&self, size: u32) -> u32 {
        size.clamp(self.min, self.max.max(self.min))
    }
}

impl Default for FontPolicy {
    fn default() -> Self {
        Self {
            step: 2,
            min: 8,
            max: 96,
        }
    }
}

/// Styling applied to freshly placed boxes.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxTemplate {
    pub title: String,
    pub bg_color: Color,
    pub text_color: Color,
    pub font_size: u32,
}

impl Default for BoxTemplate {
    fn default() -> Self {
        Self {
            title: "Title".to_string(),
            bg_color: Color::white(),
            text_color: Color::black(),
            font_size: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridBox {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    pub title: String,
    #[serde(default)]
    pub variable: Option<String>,
    pub bg_color: Color,
    pub text_color: Color,
    pub font_size: u32,
}

impl GridBox {
    pub fn from_template(footprint: Footprint, template: &BoxTemplate) -> Self {
        Self {
            x: footprint.x,
            y: footprint.y,
            w: footprint.w,
            h: footprint.h,
            title: template.title.clone(),
            variable: None,
            bg_color: template.bg_color.clone(),
            text_color: template.text_color.clone(),
            font_size: template.font_size,
        }
    }

    pub fn footprint(&self) -> Footprint {
        Footprint::new(self.x, self.y, self.w, self.h)
    }
}

/// A single edit to one placed box.
#[derive(Debug, Clone, PartialEq)]
pub enum BoxUpdate {
    SetTitle(String),
    SetBgColor(Color),
    SetTextColor(Color),
    SetFontSize(u32),
    IncreaseFont,
    DecreaseFont,
    SetVariable(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub id: ViewId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default, alias = "data")]
    pub rows: Vec<Record>,
    #[serde(default)]
    pub boxes: Vec<GridBox>,
    #[serde(default)]
    pub excel_name: Option<String>,
}

impl View {
    pub fn new(name: &str) -> Result<Self, EditError> {
        let name = Self::validate_name(name)?;
        let now = Utc::now();
        Ok(Self {
            id: ViewId::new(),
            name,
            created_at: now,
            updated_at: now,
            headers: Vec::new(),
            rows: Vec::new(),
            boxes: Vec::new(),
            excel_name: None,
        })
    }

    fn validate_name(name: &str) -> Result<String, EditError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditError::BlankName);
        }
        Ok(name.to_string())
    }

    /// Refresh `updated_at`, never moving it backwards.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }

    pub fn rename(&mut self, name: &str) -> Result<(), EditError> {
        self.name = Self::validate_name(name)?;
        self.touch();
        Ok(())
    }

    pub fn footprints(&self) -> impl Iterator<Item = Footprint> + '_ {
        self.boxes.iter().map(GridBox::footprint)
    }

    /// Append a box if the grid model accepts `footprint`; returns its index.
    pub fn place_box(
        &mut self,
        footprint: Footprint,
        template: &BoxTemplate,
        grid: GridSize,
    ) -> Result<usize, PlacementError> {
        can_place(self.footprints(), footprint, grid)?;
        self.boxes.push(GridBox::from_template(footprint, template));
        self.touch();
        Ok(self.boxes.len() - 1)
    }

    pub fn remove_box(&mut self, index: usize) -> Result<GridBox, EditError> {
        if index >= self.boxes.len() {
            return Err(EditError::NoSuchBox(index));
        }
        let removed = self.boxes.remove(index);
        self.touch();
        Ok(removed)
    }

    pub fn apply(
        &mut self,
        index: usize,
        update: BoxUpdate,
        fonts: &FontPolicy,
    ) -> Result<(), EditError> {
        if let BoxUpdate::SetVariable(Some(header)) = &update {
            if !self.headers.iter().any(|h| h == header) {
                return Err(EditError::UnknownHeader(header.clone()));
            }
        }

        let target = self
            .boxes
            .get_mut(index)
            .ok_or(EditError::NoSuchBox(index))?;

        match update {
            BoxUpdate::SetTitle(title) => {
                if title.trim().is_empty() {
                    return Err(EditError::BlankTitle);
                }
                target.title = title.trim().to_string();
            }
            BoxUpdate::SetBgColor(color) => target.bg_color = color,
            BoxUpdate::SetTextColor(color) => target.text_color = color,
            BoxUpdate::SetFontSize(size) => target.font_size = fonts.clamp(size),
            BoxUpdate::IncreaseFont => {
                target.font_size = fonts.clamp(target.font_size.saturating_add(fonts.step))
            }
            BoxUpdate::DecreaseFont => {
                target.font_size = fonts.clamp(target.font_size.saturating_sub(fonts.step))
            }
            BoxUpdate::SetVariable(variable) => target.variable = variable,
        }

        self.touch();
        Ok(())
    }

    /// Replace the imported data, keeping box placements.
    ///
    /// Boxes bound to a column that is no longer present are unbound; their
    /// indices are returned.
    pub fn replace_data(
        &mut self,
        headers: Vec<String>,
        rows: Vec<Record>,
        source_name: Option<String>,
    ) -> Vec<usize> {
        let mut unbound = Vec::new();
        for (index, b) in self.boxes.iter_mut().enumerate() {
            let dangling = b
                .variable
                .as_ref()
                .is_some_and(|v| !headers.iter().any(|h| h == v));
            if dangling {
                b.variable = None;
                unbound.push(index);
            }
        }

        self.headers = headers;
        self.rows = rows;
        self.excel_name = source_name;
        self.touch();
        unbound
    }

    /// Value shown by a bound box: its column in the first data row.
    pub fn bound_value(&self, b: &GridBox) -> Option<&CellValue> {
        let variable = b.variable.as_ref()?;
        self.rows.first()?.get(variable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_with_data() -> View {
        let mut view = View::new("Sales").unwrap();
        let mut row = Record::new();
        row.insert("Revenue".to_string(), CellValue::Number(1200.0));
        row.insert("Region".to_string(), CellValue::Text("North".to_string()));
        view.replace_data(
            vec!["Revenue".to_string(), "Region".to_string()],
            vec![row],
            Some("sales.xlsx".to_string()),
        );
        view
    }

    fn place(view: &mut View, x: u32, y: u32, w: u32, h: u32) -> Result<usize, PlacementError> {
        view.place_box(
            Footprint::new(x, y, w, h),
            &BoxTemplate::default(),
            GridSize::STANDARD,
        )
    }

    #[test]
    fn test_new_view_is_empty() {
        let view = View::new("  Quarterly  ").unwrap();
        assert_eq!(view.name, "Quarterly");
        assert!(view.boxes.is_empty());
        assert!(view.headers.is_empty());
        assert_eq!(view.excel_name, None);
        assert_eq!(view.created_at, view.updated_at);
    }

    #[test]
    fn test_blank_name_rejected() {
        assert_eq!(View::new("   "), Err(EditError::BlankName));
    }

    #[test]
    fn test_place_box_uses_template() {
        let mut view = View::new("Ops").unwrap();
        let index = place(&mut view, 0, 0, 2, 2).unwrap();
        let placed = &view.boxes[index];
        assert_eq!(placed.title, "Title");
        assert_eq!(placed.variable, None);
        assert_eq!(placed.font_size, 16);
        assert_eq!(placed.footprint(), Footprint::new(0, 0, 2, 2));
    }

    #[test]
    fn test_rejected_placement_leaves_boxes_unchanged() {
        let mut view = View::new("Ops").unwrap();
        place(&mut view, 0, 0, 2, 2).unwrap();
        let before = view.clone();

        assert_eq!(
            place(&mut view, 1, 1, 2, 2),
            Err(PlacementError::Occupied { index: 0 })
        );
        assert_eq!(view, before);
    }

    #[test]
    fn test_font_size_is_clamped() {
        let mut view = View::new("Ops").unwrap();
        place(&mut view, 0, 0, 1, 1).unwrap();
        let fonts = FontPolicy::default();

        view.apply(0, BoxUpdate::SetFontSize(10), &fonts).unwrap();
        for _ in 0..5 {
            view.apply(0, BoxUpdate::DecreaseFont, &fonts).unwrap();
        }
        assert_eq!(view.boxes[0].font_size, 8);

        view.apply(0, BoxUpdate::IncreaseFont, &fonts).unwrap();
        assert_eq!(view.boxes[0].font_size, 10);

        view.apply(0, BoxUpdate::SetFontSize(500), &fonts).unwrap();
        assert_eq!(view.boxes[0].font_size, 96);
    }

    #[test]
    fn test_apply_validates_binding_and_index() {
        let mut view = view_with_data();
        place(&mut view, 0, 0, 2, 1).unwrap();
        let fonts = FontPolicy::default();

        assert_eq!(
            view.apply(0, BoxUpdate::SetVariable(Some("Profit".to_string())), &fonts),
            Err(EditError::UnknownHeader("Profit".to_string()))
        );
        assert_eq!(
            view.apply(3, BoxUpdate::SetTitle("x".to_string()), &fonts),
            Err(EditError::NoSuchBox(3))
        );
        assert_eq!(
            view.apply(0, BoxUpdate::SetTitle("  ".to_string()), &fonts),
            Err(EditError::BlankTitle)
        );

        view.apply(0, BoxUpdate::SetVariable(Some("Region".to_string())), &fonts)
            .unwrap();
        assert_eq!(view.boxes[0].variable.as_deref(), Some("Region"));
    }

    #[test]
    fn test_bound_box_resolves_cell_value() {
        let mut view = view_with_data();
        place(&mut view, 0, 0, 2, 2).unwrap();
        view.apply(
            0,
            BoxUpdate::SetVariable(Some("Revenue".to_string())),
            &FontPolicy::default(),
        )
        .unwrap();

        let value = view.bound_value(&view.boxes[0]).unwrap();
        assert_eq!(value.to_string(), "1200");
    }

    #[test]
    fn test_reimport_unbinds_dangling_boxes() {
        let mut view = view_with_data();
        let fonts = FontPolicy::default();
        place(&mut view, 0, 0, 2, 1).unwrap();
        place(&mut view, 2, 0, 2, 1).unwrap();
        view.apply(0, BoxUpdate::SetVariable(Some("Revenue".to_string())), &fonts)
            .unwrap();
        view.apply(1, BoxUpdate::SetVariable(Some("Region".to_string())), &fonts)
            .unwrap();

        let unbound = view.replace_data(vec!["Revenue".to_string()], Vec::new(), None);

        assert_eq!(unbound, vec![1]);
        assert_eq!(view.boxes.len(), 2);
        assert_eq!(view.boxes[0].variable.as_deref(), Some("Revenue"));
        assert_eq!(view.boxes[1].variable, None);
    }

    #[test]
    fn test_remove_box() {
        let mut view = View::new("Ops").unwrap();
        place(&mut view, 0, 0, 2, 2).unwrap();
        let removed = view.remove_box(0).unwrap();
        assert_eq!(removed.footprint(), Footprint::new(0, 0, 2, 2));
        assert_eq!(view.remove_box(0), Err(EditError::NoSuchBox(0)));

        // The freed space can be reused
        assert_eq!(place(&mut view, 1, 1, 2, 2), Ok(0));
    }

    #[test]
    fn test_serde_uses_camel_case_and_accepts_data_alias() {
        let view = view_with_data();
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("excelName").is_some());

        let mut legacy = json.clone();
        let rows = legacy.as_object_mut().unwrap().remove("rows").unwrap();
        legacy.as_object_mut().unwrap().insert("data".to_string(), rows);
        let restored: View = serde_json::from_value(legacy).unwrap();
        assert_eq!(restored, view);
    }

    #[test]
    fn test_cell_value_display() {
        assert_eq!(CellValue::Number(3.5).to_string(), "3.5");
        assert_eq!(CellValue::Number(-42.0).to_string(), "-42");
        assert_eq!(CellValue::Bool(true).to_string(), "TRUE");
        assert_eq!(CellValue::Empty.to_string(), "");
    }
}
