//! Static printer catalog.

/// A 3D printer's relevant specs for fitting a split part.
#[derive(Debug, Clone)]
pub struct Printer {
    /// Stable identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Bed size in millimeters, `(x, y, z)`.
    pub bed_size_mm: (f64, f64, f64),
    /// Supported filament materials.
    pub materials: &'static [&'static str],
}

/// The fixed catalog of supported printers.
pub fn list_printers() -> Vec<Printer> {
    vec![
        Printer {
            id: "creality-ender-3",
            name: "Creality Ender 3",
            bed_size_mm: (220.0, 220.0, 250.0),
            materials: &["PLA", "PETG", "ABS"],
        },
        Printer {
            id: "bambu-lab-x1c",
            name: "Bambu Lab X1C",
            bed_size_mm: (256.0, 256.0, 256.0),
            materials: &["PLA", "PETG", "ABS", "ASA", "PA", "PC"],
        },
        Printer {
            id: "prusa-mk4",
            name: "Prusa MK4",
            bed_size_mm: (250.0, 210.0, 220.0),
            materials: &["PLA", "PETG", "ABS", "ASA", "PA", "PC"],
        },
        Printer {
            id: "elegoo-neptune-4",
            name: "Elegoo Neptune 4",
            bed_size_mm: (225.0, 225.0, 265.0),
            materials: &["PLA", "PETG", "ABS", "TPU"],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_four_printers() {
        assert_eq!(list_printers().len(), 4);
    }

    #[test]
    fn test_bambu_and_prusa_support_six_materials() {
        let printers = list_printers();
        let bambu = printers.iter().find(|p| p.id == "bambu-lab-x1c").unwrap();
        let prusa = printers.iter().find(|p| p.id == "prusa-mk4").unwrap();
        assert_eq!(bambu.materials.len(), 6);
        assert_eq!(prusa.materials.len(), 6);
    }
}
