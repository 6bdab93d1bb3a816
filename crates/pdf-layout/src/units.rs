//! Page sizes and unit conversion

/// Points per millimetre
pub const MM: f32 = 72.0 / 25.4;

/// Millimetres to points
pub fn mm(value: f32) -> f32 {
    value * MM
}

/// Page size in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

/// ISO A4, 210 × 297 mm
pub const A4: PageSize = PageSize {
    width: 210.0 * MM,
    height: 297.0 * MM,
};

impl PageSize {
    pub fn landscape(self) -> PageSize {
        PageSize {
            width: self.width.max(self.height),
            height: self.width.min(self.height),
        }
    }

    pub fn portrait(self) -> PageSize {
        PageSize {
            width: self.width.min(self.height),
            height: self.width.max(self.height),
        }
    }
}
