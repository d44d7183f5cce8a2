//! GPU tier classification.
//!
//! Renderer strings are bucketed into coarse tiers 0-3 by substring matching.
//! The classification table is expected to need ongoing tuning as hardware
//! generations ship, so it lives in a replaceable [`GpuTierTable`] value
//! rather than inline conditionals.

/// GPU identification plus the estimated tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuInfo {
    /// Vendor string, `"unknown"` when the environment cannot report one.
    pub vendor: String,
    /// Renderer string, `"unknown"` when the environment cannot report one.
    pub renderer: String,
    /// Estimated tier: 0 = no GPU info, 1 = baseline, 2 = current-generation
    /// mobile, 3 = discrete desktop.
    pub tier: u8,
}

/// Substring-to-tier mapping for renderer strings.
///
/// Rules are evaluated in order: mobile GPU families first (with a
/// generation-marker check distinguishing current parts), then integrated,
/// then discrete desktop vendors. Anything with a renderer string that
/// matches no rule gets the baseline tier.
#[derive(Debug, Clone)]
pub struct GpuTierTable {
    /// Mobile GPU family markers (Adreno, Mali, PowerVR).
    pub mobile_families: Vec<String>,
    /// Generation digits that promote a mobile part to tier 2.
    pub current_gen_markers: Vec<String>,
    /// Integrated GPU markers pinned at tier 1.
    pub integrated: Vec<String>,
    /// Discrete desktop GPU markers at tier 3.
    pub discrete: Vec<String>,
}

impl Default for GpuTierTable {
    fn default() -> Self {
        Self {
            mobile_families: vec!["Adreno".into(), "Mali".into(), "PowerVR".into()],
            current_gen_markers: vec!["6".into(), "7".into(), "8".into()],
            integrated: vec!["Intel".into()],
            discrete: vec!["NVIDIA".into(), "AMD".into()],
        }
    }
}

impl GpuTierTable {
    /// Classify a renderer string into a tier.
    ///
    /// `None` (no GPU context could be created) is tier 0.
    pub fn classify(&self, renderer: Option<&str>) -> u8 {
        let Some(renderer) = renderer else {
            return 0;
        };

        if self.mobile_families.iter().any(|f| renderer.contains(f.as_str())) {
            if self.current_gen_markers.iter().any(|m| renderer.contains(m.as_str())) {
                return 2;
            }
            return 1;
        }
        if self.integrated.iter().any(|m| renderer.contains(m.as_str())) {
            return 1;
        }
        if self.discrete.iter().any(|m| renderer.contains(m.as_str())) {
            return 3;
        }
        1
    }

    /// Build a [`GpuInfo`] from optional vendor/renderer strings.
    pub fn info(&self, vendor: Option<&str>, renderer: Option<&str>) -> GpuInfo {
        GpuInfo {
            vendor: vendor.unwrap_or("unknown").to_string(),
            renderer: renderer.unwrap_or("unknown").to_string(),
            tier: self.classify(renderer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_renderer_is_tier_zero() {
        assert_eq!(GpuTierTable::default().classify(None), 0);
    }

    #[test]
    fn test_current_gen_mobile_is_tier_two() {
        let table = GpuTierTable::default();
        assert_eq!(table.classify(Some("Adreno (TM) 740")), 2);
        assert_eq!(table.classify(Some("Mali-G78 MP14")), 2);
    }

    #[test]
    fn test_older_mobile_is_tier_one() {
        let table = GpuTierTable::default();
        assert_eq!(table.classify(Some("Adreno (TM) 540")), 1);
        assert_eq!(table.classify(Some("PowerVR Rogue GE5300")), 1);
    }

    #[test]
    fn test_discrete_desktop_is_tier_three() {
        let table = GpuTierTable::default();
        assert_eq!(table.classify(Some("NVIDIA GeForce RTX 3060")), 3);
        assert_eq!(table.classify(Some("AMD Radeon RX 580")), 3);
    }

    #[test]
    fn test_integrated_is_tier_one() {
        assert_eq!(
            GpuTierTable::default().classify(Some("Intel(R) Iris(R) Xe Graphics")),
            1
        );
    }

    #[test]
    fn test_unrecognized_renderer_gets_baseline() {
        assert_eq!(GpuTierTable::default().classify(Some("llvmpipe (LLVM 15.0)")), 1);
    }

    #[test]
    fn test_table_is_replaceable() {
        let table = GpuTierTable {
            discrete: vec!["llvmpipe".into()],
            ..GpuTierTable::default()
        };
        assert_eq!(table.classify(Some("llvmpipe (LLVM 15.0)")), 3);
    }
}
