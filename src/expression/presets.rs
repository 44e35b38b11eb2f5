//! expression::presets — the built-in function catalogue.
//!
//! Each preset is an expression in the main variable `z` plus the grid view
//! it is shown on. Parameters of a preset get their defaults from the usual
//! heuristic once compiled.
use super::{
    errors::ExprResult,
    function::{CompiledFunction, FunctionCompiler},
};
use crate::grid::ComplexGridArray;

/// Main variable of every preset.
pub const PRESET_VARIABLE: &str = "z";

/// Which starting view a preset is displayed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetView {
    Default,
    Zeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub expression: &'static str,
    pub view: PresetView,
}

impl Preset {
    const fn new(name: &'static str, expression: &'static str) -> Self {
        Preset { name, expression, view: PresetView::Default }
    }

    /// Fresh grid for this preset's view.
    pub fn grid(&self) -> ComplexGridArray {
        match self.view {
            PresetView::Default => ComplexGridArray::default_view(),
            PresetView::Zeta => ComplexGridArray::zeta_view(),
        }
    }

    pub fn compile(&self, compiler: &FunctionCompiler) -> ExprResult<CompiledFunction> {
        compiler.compile(self.expression, PRESET_VARIABLE)
    }
}

pub static PRESETS: [Preset; 10] = [
    Preset::new("identity", "z"),
    Preset::new("sine", "a*sin(w*z)"),
    Preset::new("cosine", "a*cos(w*z)"),
    Preset::new("exp", "a*exp(w*z)"),
    Preset::new("erf", "a*erf(w*z)"),
    Preset::new("gaussian", "a*exp(-z**2/(2*(sigma)**2))/2"),
    Preset::new("sinc", "a*sinc(w*(6.5)*z)/2"),
    Preset::new("inverse z", "w/(z - a)"),
    Preset { name: "zeta", expression: "zeta(k*(z - w))", view: PresetView::Zeta },
    Preset::new("inverse z squared", "1/(w*(z-a))**2"),
];

/// Look a preset up by its display name.
pub fn preset(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::function::CompilerOptions;

    #[test]
    // Purpose
    // -------
    // Every catalogue entry compiles over `z` and gets the slider defaults
    // the heuristic is expected to produce (scales 1, shifts 0).
    fn presets_compile_with_expected_defaults() {
        let compiler = FunctionCompiler::new(CompilerOptions::default()).unwrap();
        let expected: [(&str, &[(&str, f64)]); 10] = [
            ("identity", &[]),
            ("sine", &[("a", 1.0), ("w", 1.0)]),
            ("cosine", &[("a", 1.0), ("w", 1.0)]),
            ("exp", &[("a", 1.0), ("w", 1.0)]),
            ("erf", &[("a", 1.0), ("w", 1.0)]),
            ("gaussian", &[("a", 1.0), ("sigma", 1.0)]),
            ("sinc", &[("a", 1.0), ("w", 1.0)]),
            ("inverse z", &[("w", 1.0), ("a", 0.0)]),
            ("zeta", &[("k", 1.0), ("w", 0.0)]),
            ("inverse z squared", &[("w", 1.0), ("a", 1.0)]),
        ];
        for (name, defaults) in expected {
            let f = preset(name).unwrap().compile(&compiler).unwrap();
            assert_eq!(f.default_table(), defaults.to_vec(), "{name}");
        }
    }

    #[test]
    fn lookup_and_views() {
        assert!(preset("tangent").is_none());
        assert_eq!(preset("zeta").unwrap().grid(), ComplexGridArray::zeta_view());
        assert_eq!(preset("sine").unwrap().grid(), ComplexGridArray::default_view());
        assert!(PRESETS.iter().filter(|p| p.view == PresetView::Zeta).count() == 1);
    }
}
