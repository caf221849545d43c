use crate::constants::{GridMode, Location};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString, IntoEnumIterator};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum GridLayer {
    Hand,
    Layer2,
    Outer,
}

impl GridLayer {
    fn group_key(&self) -> String {
        format!("{self}_points")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridPoint {
    pub name: String,
    pub location: Location,
    pub layer: GridLayer,
    /// `None` means present but unplaced.
    pub coordinate: Option<Point>,
}

#[derive(Error, Debug)]
pub enum GridError {
    #[error("Unknown grid point '{0}'")]
    UnknownPoint(String),
    #[error("Unknown grid mode '{0}'")]
    UnknownMode(String),
    #[error("Required grid point '{0}' has no coordinate")]
    MissingRequired(String),
    #[error("Grid data error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parses `"(x, y)"`; the literal `"None"` is an unplaced point.
pub fn parse_coordinate(raw: &str) -> Result<Option<Point>, String> {
    let raw = raw.trim();
    if raw == "None" {
        return Ok(None);
    }
    let inner = raw
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| format!("expected '(x, y)', got '{raw}'"))?;
    let mut parts = inner.split(',').map(str::trim);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(x), Some(y), None) => {
            let x = x.parse::<f64>().map_err(|e| format!("bad x in '{raw}': {e}"))?;
            let y = y.parse::<f64>().map_err(|e| format!("bad y in '{raw}': {e}"))?;
            Ok(Some(Point::new(x, y)))
        }
        _ => Err(format!("expected two components in '{raw}'")),
    }
}

#[derive(Debug, Clone, Default)]
pub struct GridLayout {
    pub points: BTreeMap<String, GridPoint>,
    pub center: Option<Point>,
}

impl GridLayout {
    fn parse(mode: GridMode, raw: BTreeMap<String, serde_json::Value>) -> Result<Self, GridError> {
        let mut layout = Self::default();

        for (key, value) in raw {
            if key == "center_point" {
                let coord = value.as_str().map(read_coordinate).unwrap_or(None);
                layout.center = Some(coord.ok_or_else(|| {
                    GridError::MissingRequired(format!("{mode}.center_point"))
                })?);
                continue;
            }

            let layer = GridLayer::iter()
                .find(|l| l.group_key() == key)
                .ok_or_else(|| GridError::UnknownPoint(key.clone()))?;
            let entries: BTreeMap<String, String> = serde_json::from_value(value)?;

            for (name, coord) in entries {
                let location = parse_point_name(&name, mode, layer)?;
                layout.points.insert(
                    name.clone(),
                    GridPoint {
                        name,
                        location,
                        layer,
                        coordinate: read_coordinate(&coord),
                    },
                );
            }
        }

        if layout.center.is_none() {
            return Err(GridError::MissingRequired(format!("{mode}.center_point")));
        }
        if let Some(point) = layout
            .points
            .values()
            .find(|p| p.layer == GridLayer::Hand && p.coordinate.is_none())
        {
            return Err(GridError::MissingRequired(point.name.clone()));
        }
        Ok(layout)
    }
}

fn read_coordinate(raw: &str) -> Option<Point> {
    parse_coordinate(raw).unwrap_or_else(|e| {
        log::warn!("Malformed grid coordinate: {}", e);
        None
    })
}

fn parse_point_name(name: &str, mode: GridMode, layer: GridLayer) -> Result<Location, GridError> {
    let unknown = || GridError::UnknownPoint(name.to_string());
    let mut parts = name.split('_');
    let location = parts
        .next()
        .and_then(|s| Location::from_str(s).ok())
        .filter(|l| *l != Location::Center)
        .ok_or_else(unknown)?;
    let expected = [mode.to_string(), layer.to_string(), "point".to_string()];
    let rest: Vec<&str> = parts.collect();
    if rest != expected {
        return Err(unknown());
    }
    Ok(location)
}

#[derive(Debug, Clone)]
pub struct GridData {
    layouts: HashMap<GridMode, GridLayout>,
}

const EMBEDDED_GRID: &str = include_str!("grid_points.json");

impl GridData {
    pub fn from_json(json: &str) -> Result<Self, GridError> {
        let raw: BTreeMap<String, BTreeMap<String, serde_json::Value>> =
            serde_json::from_str(json)?;
        let mut layouts = HashMap::new();
        for (mode, groups) in raw {
            let mode = GridMode::from_str(&mode).map_err(|_| GridError::UnknownMode(mode))?;
            layouts.insert(mode, GridLayout::parse(mode, groups)?);
        }
        Ok(Self { layouts })
    }

    pub fn embedded() -> Self {
        // covered by test_embedded_grid_loads
        Self::from_json(EMBEDDED_GRID).expect("embedded grid data is valid")
    }

    pub fn layout(&self, mode: GridMode) -> Option<&GridLayout> {
        self.layouts.get(&mode)
    }

    pub fn center(&self, mode: GridMode) -> Option<Point> {
        self.layout(mode).and_then(|l| l.center)
    }

    pub fn point(&self, mode: GridMode, name: &str) -> Option<&GridPoint> {
        self.layout(mode).and_then(|l| l.points.get(name))
    }

    pub fn point_in_layer(&self, mode: GridMode, loc: Location, layer: GridLayer) -> Option<Point> {
        if loc == Location::Center {
            return self.center(mode);
        }
        self.point(mode, &format!("{loc}_{mode}_{layer}_point"))
            .and_then(|p| p.coordinate)
    }

    /// Hand layer first, then layer2, then outer.
    pub fn point_for(&self, mode: GridMode, loc: Location) -> Option<Point> {
        if loc == Location::Center {
            return self.center(mode);
        }
        GridLayer::iter().find_map(|layer| self.point_in_layer(mode, loc, layer))
    }

    pub fn nearest(&self, mode: GridMode, target: Point, layer: GridLayer) -> Option<&GridPoint> {
        self.layout(mode)?
            .points
            .values()
            .filter(|p| p.layer == layer)
            .filter_map(|p| p.coordinate.map(|c| (p, c.distance(target))))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(p, _)| p)
    }
}
