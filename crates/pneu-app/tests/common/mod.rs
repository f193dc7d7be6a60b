#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use pneu_app::repository::{open_stores_at, Stores};
use pneu_types::{
    Attr, Error, ExtractedTire, ManufactureWeek, ManufactureYear, Plate, Result, TireCondition,
    TireObservation, TirePosition,
};
use pneu_vision::AttributeExtractor;

/// Baseline keys from the rotation and fraud walkthroughs
pub const BASE: [(u8, u8); 5] = [(41, 19), (12, 21), (5, 20), (30, 18), (22, 22)];

pub fn tire(position: TirePosition, (week, year): (u8, u8)) -> TireObservation {
    let mut t = TireObservation::dated(
        position,
        ManufactureWeek::new(week).unwrap(),
        ManufactureYear::new(year).unwrap(),
    );
    t.brand = Attr::Known("Pirelli".to_string());
    t.condition = TireCondition::Good;
    t
}

pub fn tires(keys: [(u8, u8); 5]) -> Vec<TireObservation> {
    TirePosition::ALL
        .iter()
        .zip(keys)
        .map(|(p, k)| tire(*p, k))
        .collect()
}

pub fn plate() -> Plate {
    Plate::parse("ABC1D23").unwrap()
}

pub fn stores(dir: &Path) -> Stores {
    open_stores_at(dir.join("store")).unwrap()
}

/// Write a tiny valid PNG
pub fn write_photo(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    image::RgbImage::new(2, 2).save(&path).unwrap();
    path
}

/// Extractor that answers from a table keyed by file stem
pub struct FakeExtractor {
    pub tires: HashMap<String, ExtractedTire>,
    pub plate: Attr<String>,
    /// Number of calls that fail before answers start coming back
    pub failures_left: Cell<u32>,
    pub calls: Cell<u32>,
}

impl FakeExtractor {
    pub fn new() -> Self {
        Self {
            tires: HashMap::new(),
            plate: Attr::Unknown,
            failures_left: Cell::new(0),
            calls: Cell::new(0),
        }
    }

    pub fn with_tire(mut self, stem: &str, key: Option<(u8, u8)>) -> Self {
        let extracted = ExtractedTire {
            dot: Attr::Unknown,
            brand: Attr::Known("Michelin".to_string()),
            condition: TireCondition::Good,
            manufacture_week: key
                .map(|(w, _)| Attr::Known(ManufactureWeek::new(w).unwrap()))
                .unwrap_or(Attr::Unknown),
            manufacture_year: key
                .map(|(_, y)| Attr::Known(ManufactureYear::new(y).unwrap()))
                .unwrap_or(Attr::Unknown),
        };
        self.tires.insert(stem.to_string(), extracted);
        self
    }

    pub fn with_plate(mut self, text: &str) -> Self {
        self.plate = Attr::from_text(text);
        self
    }

    pub fn failing(self, times: u32) -> Self {
        self.failures_left.set(times);
        self
    }
}

impl AttributeExtractor for FakeExtractor {
    fn extract_tire_attributes(&self, image_path: &Path) -> Result<ExtractedTire> {
        self.calls.set(self.calls.get() + 1);
        if self.failures_left.get() > 0 {
            self.failures_left.set(self.failures_left.get() - 1);
            return Err(Error::Extraction("backend timeout".to_string()));
        }
        let stem = image_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        self.tires
            .get(stem)
            .cloned()
            .ok_or_else(|| Error::Extraction(format!("no answer for {}", stem)))
    }

    fn extract_plate_text(&self, _image_path: &Path) -> Result<Attr<String>> {
        Ok(self.plate.clone())
    }
}
