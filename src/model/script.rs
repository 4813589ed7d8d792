//! Structured builder for the SolidStateDetectors.jl charge-density script.
//!
//! The assembler produces an ordered list of [`Statement`]s; [`render`] is
//! the only place that knows the Julia syntax. Consecutive statements of the
//! same kind are grouped into one block (struct body, formula body,
//! constructor list, instantiation call).

use std::fmt::Write;

use super::region::{DensityTerm, GeometricRegion, GradientKernel, ParentSide, RadialGradientTerm};

const SSD: &str = "SolidStateDetectors";
const STRUCT_NAME: &str = "CustomChargeDensity";
const ZERO_F32: &str = "0.0f0";

/// Julia modules the script imports.
pub const MODULES: [&str; 3] = ["SolidStateDetectors", "IntervalSets", "SpecialFunctions"];

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Using(&'static str),
    /// Precision alias, `T=Float32`.
    FloatType(&'static str),
    /// Geometry/density field pair `G{index}` / `L{index}` of the struct.
    Field { index: usize },
    /// `indicator × density [× kernel]`, with the radial term folded into the
    /// bulk entry.
    FormulaTerm {
        index: usize,
        kernel: Option<GradientKernel>,
        radial: Option<RadialGradientTerm>,
    },
    Geometry { index: usize, region: GeometricRegion },
    Density { index: usize, term: DensityTerm },
    /// One `G{index},CD{index}` pair of the final constructor call.
    InstantiationArg { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Header,
    Struct,
    Formula,
    Definitions,
    Instantiation,
}

impl Statement {
    fn block(&self) -> Block {
        match self {
            Statement::Using(_) | Statement::FloatType(_) => Block::Header,
            Statement::Field { .. } => Block::Struct,
            Statement::FormulaTerm { .. } => Block::Formula,
            Statement::Geometry { .. } | Statement::Density { .. } => Block::Definitions,
            Statement::InstantiationArg { .. } => Block::Instantiation,
        }
    }
}

/// Ordered statements of one script.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    statements: Vec<Statement>,
}

impl Script {
    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn render(&self) -> String {
        render(&self.statements)
    }
}

/// Format a float so that Julia reads it back as the same Float64.
pub fn literal(x: f64) -> String {
    let a = x.abs();
    if a != 0.0 && a.is_finite() && !(1e-4..1e16).contains(&a) {
        return format!("{x:e}");
    }
    let s = format!("{x}");
    if s.contains('.') || !x.is_finite() {
        s
    } else {
        format!("{s}.0")
    }
}

fn open(out: &mut String, block: Block) {
    match block {
        Block::Header | Block::Definitions => {}
        Block::Struct => {
            let _ = writeln!(
                out,
                "struct {STRUCT_NAME}{{T, N}} <: {SSD}.AbstractChargeDensity{{T}}"
            );
        }
        Block::Formula => {
            let _ = writeln!(
                out,
                "function {SSD}.get_charge_density(cdm::{STRUCT_NAME}{{T}}, \
                 pt::{SSD}.AbstractCoordinatePoint{{T}})::T where {{T}}"
            );
        }
        Block::Instantiation => {
            let _ = write!(out, "ccdm = {STRUCT_NAME}(");
        }
    }
}

fn close(out: &mut String, block: Block) {
    match block {
        Block::Header | Block::Definitions => out.push('\n'),
        Block::Struct => out.push_str("end\n\n"),
        Block::Formula => out.push_str("\nend\n\n"),
        Block::Instantiation => out.push_str(")\n"),
    }
}

fn point(t: [f64; 3]) -> String {
    format!(
        "CartesianPoint{{T}}({}, {}, {})",
        literal(t[0]),
        literal(t[1]),
        literal(t[2])
    )
}

fn geometry(region: &GeometricRegion) -> String {
    match *region {
        GeometricRegion::Tube { r, z, translation } => format!(
            "{SSD}.Tube{{T}}({}..{},0..2π,{}..{},{})",
            literal(r.0),
            literal(r.1),
            literal(z.0),
            literal(z.1),
            point(translation)
        ),
        GeometricRegion::HexagonalPrism {
            inner_radius,
            outer_radius,
            thickness,
            translation,
            rotation,
        } => format!(
            "{SSD}.HexagonalPrism{{T}}({}, {}, {},{},{})",
            literal(inner_radius),
            literal(outer_radius),
            literal(thickness),
            point(translation),
            literal(rotation)
        ),
    }
}

fn density(term: &DensityTerm) -> String {
    match *term {
        DensityTerm::Linear { constant } => format!(
            "{SSD}.LinearChargeDensity{{T}}(({ZERO_F32},{ZERO_F32},{}),({ZERO_F32},{ZERO_F32},{ZERO_F32}))",
            literal(constant)
        ),
        DensityTerm::Cylindrical {
            constant,
            radial_slope,
        } => format!(
            "{SSD}.CylindricalChargeDensity{{T}}(({ZERO_F32},{ZERO_F32},{}),({},{ZERO_F32},{ZERO_F32}))",
            literal(constant),
            literal(radial_slope)
        ),
    }
}

fn kernel_factor(kernel: &GradientKernel) -> String {
    match *kernel {
        GradientKernel::Gaussian { center, straggle } => format!(
            " * exp(-(pt[3]-({}))^2/(2*{}^2))",
            literal(center),
            literal(straggle)
        ),
        GradientKernel::ErrorFunction {
            center,
            straggle,
            parent,
        } => match parent {
            ParentSide::Below => format!(
                " * erfc(-(pt[3]-({}))/(2*{}))/2",
                literal(center),
                literal(straggle)
            ),
            ParentSide::Above => format!(
                " * (1 + erf(-(pt[3]-({}))/(2*{})))/2",
                literal(center),
                literal(straggle)
            ),
        },
    }
}

fn formula_term(
    index: usize,
    kernel: &Option<GradientKernel>,
    radial: &Option<RadialGradientTerm>,
) -> String {
    let base = format!("{SSD}.get_charge_density(cdm.L{index}, pt)");
    let value = match radial {
        Some(RadialGradientTerm::ErrorFunction {
            stdev,
            height,
            shift,
        }) => format!(
            "({base} + {} * (1 + erf((sqrt(pt[1]^2+pt[2]^2)-({}))/(2*{})))/2)",
            literal(*height),
            literal(*shift),
            literal(*stdev)
        ),
        Some(RadialGradientTerm::Linear { .. }) | None => base,
    };
    let factor = kernel.as_ref().map(kernel_factor).unwrap_or_default();
    format!("\t(pt in cdm.G{index}) * {value}{factor}")
}

/// Render the statements into the final script text.
pub fn render(statements: &[Statement]) -> String {
    let mut out = String::new();
    let mut current: Option<Block> = None;
    let mut first_in_block = true;

    for statement in statements {
        let block = statement.block();
        if current != Some(block) {
            if let Some(previous) = current {
                close(&mut out, previous);
            }
            open(&mut out, block);
            current = Some(block);
            first_in_block = true;
        }

        match statement {
            Statement::Using(module) => {
                let _ = writeln!(out, "using {module}");
            }
            Statement::FloatType(ty) => {
                let _ = writeln!(out, "T={ty}");
            }
            Statement::Field { index } => {
                let _ = writeln!(out, "\tG{index}::{SSD}.AbstractGeometry{{T,N}}");
                let _ = writeln!(out, "\tL{index}::{SSD}.AbstractChargeDensity{{T}}");
            }
            Statement::FormulaTerm {
                index,
                kernel,
                radial,
            } => {
                if !first_in_block {
                    out.push_str(" +\n");
                }
                out.push_str(&formula_term(*index, kernel, radial));
            }
            Statement::Geometry { index, region } => {
                let _ = writeln!(out, "G{index} = {}", geometry(region));
            }
            Statement::Density { index, term } => {
                let _ = writeln!(out, "CD{index} = {}", density(term));
            }
            Statement::InstantiationArg { index } => {
                if !first_in_block {
                    out.push(',');
                }
                let _ = write!(out, "G{index},CD{index}");
            }
        }
        first_in_block = false;
    }

    if let Some(last) = current {
        close(&mut out, last);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_keeps_float_syntax() {
        assert_eq!(literal(2.0), "2.0");
        assert_eq!(literal(0.0), "0.0");
        assert_eq!(literal(0.002), "0.002");
        assert_eq!(literal(1e-5), "1e-5");
        assert_eq!(literal(3.7e-8), "3.7e-8");
        assert_eq!(literal(-1.9e16), "-1.9e16");
        assert_eq!(literal(5e10), "50000000000.0");
    }

    #[test]
    fn test_literal_round_trips() {
        for x in [5.15e-3, 0.1e-3 + 3f64.sqrt() * 5.15e-3, 1.0 / 3.0, -2.5e-19] {
            assert_eq!(literal(x).parse::<f64>().unwrap(), x);
        }
    }

    #[test]
    fn test_render_blocks() {
        let mut script = Script::default();
        script.push(Statement::Using("SolidStateDetectors"));
        script.push(Statement::FloatType("Float32"));
        script.push(Statement::Field { index: 1 });
        script.push(Statement::FormulaTerm {
            index: 1,
            kernel: None,
            radial: None,
        });
        script.push(Statement::FormulaTerm {
            index: 2,
            kernel: Some(GradientKernel::Gaussian {
                center: 0.5,
                straggle: 0.25,
            }),
            radial: None,
        });
        script.push(Statement::InstantiationArg { index: 1 });
        script.push(Statement::InstantiationArg { index: 2 });

        let text = script.render();
        assert!(text.starts_with("using SolidStateDetectors\nT=Float32\n\nstruct "));
        assert!(text.contains("\tG1::SolidStateDetectors.AbstractGeometry{T,N}\n"));
        assert!(text.contains(
            "\t(pt in cdm.G1) * SolidStateDetectors.get_charge_density(cdm.L1, pt) +\n\t(pt in cdm.G2)"
        ));
        assert!(text.contains(" * exp(-(pt[3]-(0.5))^2/(2*0.25^2))\nend\n\n"));
        assert!(text.ends_with("ccdm = CustomChargeDensity(G1,CD1,G2,CD2)\n"));
    }

    #[test]
    fn test_prism_syntax() {
        let region = GeometricRegion::HexagonalPrism {
            inner_radius: 0.0,
            outer_radius: 0.5,
            thickness: 0.25,
            translation: [1.0, -1.0, 0.75],
            rotation: 0.0,
        };
        assert_eq!(
            geometry(&region),
            "SolidStateDetectors.HexagonalPrism{T}(0.0, 0.5, 0.25,CartesianPoint{T}(1.0, -1.0, 0.75),0.0)"
        );
    }

    #[test]
    fn test_erf_form_follows_parent_side() {
        let below = GradientKernel::ErrorFunction {
            center: 1.5,
            straggle: 0.25,
            parent: ParentSide::Below,
        };
        let above = GradientKernel::ErrorFunction {
            center: 1.5,
            straggle: 0.25,
            parent: ParentSide::Above,
        };
        assert_eq!(kernel_factor(&below), " * erfc(-(pt[3]-(1.5))/(2*0.25))/2");
        assert_eq!(kernel_factor(&above), " * (1 + erf(-(pt[3]-(1.5))/(2*0.25)))/2");
    }
}
