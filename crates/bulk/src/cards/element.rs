//! Structural element cards
//!
//! Rigid and mass elements live in their own modules; everything here
//! participates in the element-node adjacency graph.

use crate::cards::{dof_field, fail, write_card, ThetaMcid};
use crate::error::Result;
use crate::field::{Field, Fields};

/// A structural element
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Shell(Shell),
    Solid(Solid),
    Bar(Bar),
    Rod(Rod),
    Conrod(Conrod),
    Bush(Bush),
    Spring(Spring),
    Damper(Damper),
    Gap(Gap),
    Weld(Weld),
    Fast(Fast),
    Visc(Visc),
    Shear(ShearPanel),
    Plotel(Plotel),
    HeatBoundary(HeatBoundary),
}

/// Shell element kinds sharing one card shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellKind {
    Ctria3,
    Ctria6,
    Ctriar,
    Cquad4,
    Cquad8,
    Cquadr,
}

impl ShellKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShellKind::Ctria3 => "CTRIA3",
            ShellKind::Ctria6 => "CTRIA6",
            ShellKind::Ctriar => "CTRIAR",
            ShellKind::Cquad4 => "CQUAD4",
            ShellKind::Cquad8 => "CQUAD8",
            ShellKind::Cquadr => "CQUADR",
        }
    }

    /// Required node count; mid-side nodes may still be zero
    pub fn node_count(&self) -> usize {
        match self {
            ShellKind::Ctria3 | ShellKind::Ctriar => 3,
            ShellKind::Ctria6 => 6,
            ShellKind::Cquad4 | ShellKind::Cquadr => 4,
            ShellKind::Cquad8 => 8,
        }
    }

    /// Corner nodes only, for area computation
    pub fn corner_count(&self) -> usize {
        match self {
            ShellKind::Ctria3 | ShellKind::Ctriar | ShellKind::Ctria6 => 3,
            _ => 4,
        }
    }
}

/// Triangular and quadrilateral shells
#[derive(Debug, Clone, PartialEq)]
pub struct Shell {
    pub kind: ShellKind,
    pub eid: u32,
    pub pid: u32,
    /// Mid-side slots of the higher-order kinds may hold zero
    pub nodes: Vec<u32>,
    pub theta_mcid: Option<ThetaMcid>,
    pub zoffs: Option<f64>,
    pub rest: Vec<Field>,
}

/// Solid element kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolidKind {
    Chexa,
    Cpenta,
    Ctetra,
}

impl SolidKind {
    pub fn name(&self) -> &'static str {
        match self {
            SolidKind::Chexa => "CHEXA",
            SolidKind::Cpenta => "CPENTA",
            SolidKind::Ctetra => "CTETRA",
        }
    }

    pub fn corner_count(&self) -> usize {
        match self {
            SolidKind::Chexa => 8,
            SolidKind::Cpenta => 6,
            SolidKind::Ctetra => 4,
        }
    }
}

/// Hex, wedge, and tet solids; linear or quadratic
#[derive(Debug, Clone, PartialEq)]
pub struct Solid {
    pub kind: SolidKind,
    pub eid: u32,
    pub pid: u32,
    pub nodes: Vec<u32>,
}

/// Orientation auxiliary of the line elements
#[derive(Debug, Clone, PartialEq)]
pub enum Orientation {
    /// Third node defining the reference plane
    Node(u32),
    /// Explicit direction vector
    Vector([f64; 3]),
    Blank,
}

impl Orientation {
    fn parse(fields: &Fields, index: usize) -> Result<Self> {
        Ok(match fields.get(index) {
            Field::Blank => Orientation::Blank,
            Field::Int(g0) if *g0 > 0 => Orientation::Node(*g0 as u32),
            _ => Orientation::Vector([
                fields.real(index)?,
                fields.real(index + 1)?,
                fields.real(index + 2)?,
            ]),
        })
    }

    fn fields(&self) -> [Field; 3] {
        match self {
            Orientation::Blank => [Field::Blank, Field::Blank, Field::Blank],
            Orientation::Node(g0) => [(*g0).into(), Field::Blank, Field::Blank],
            Orientation::Vector(v) => [v[0].into(), v[1].into(), v[2].into()],
        }
    }

    pub fn g0(&self) -> Option<u32> {
        match self {
            Orientation::Node(g0) => Some(*g0),
            _ => None,
        }
    }
}

/// CBAR and CBEAM share this shape; CBEAM extras ride in `rest`
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// True for CBEAM
    pub beam: bool,
    pub eid: u32,
    pub pid: u32,
    pub ga: u32,
    pub gb: u32,
    pub orient: Orientation,
    pub offt: Option<String>,
    pub rest: Vec<Field>,
}

/// CROD: pin-ended rod with a property
#[derive(Debug, Clone, PartialEq)]
pub struct Rod {
    pub eid: u32,
    pub pid: u32,
    pub ga: u32,
    pub gb: u32,
}

/// CONROD: rod with material and section on the element itself
#[derive(Debug, Clone, PartialEq)]
pub struct Conrod {
    pub eid: u32,
    pub ga: u32,
    pub gb: u32,
    pub mid: u32,
    pub a: f64,
    pub j: Option<f64>,
    pub c: Option<f64>,
    pub nsm: f64,
}

/// CBUSH orientation; a zero `g0` is preserved exactly as written
#[derive(Debug, Clone, PartialEq)]
pub enum BushOrient {
    Node(u32),
    Vector([f64; 3]),
    Blank,
}

/// CBUSH: generalized spring-damper
#[derive(Debug, Clone, PartialEq)]
pub struct Bush {
    pub eid: u32,
    pub pid: u32,
    pub ga: u32,
    /// Blank for a grounded bush
    pub gb: Option<u32>,
    pub orient: BushOrient,
    pub cid: Option<u32>,
    pub rest: Vec<Field>,
}

/// Scalar spring kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpringKind {
    Celas1,
    Celas2,
    Celas3,
    Celas4,
}

/// CELAS1-4: scalar springs
///
/// Kinds 1 and 2 connect grid components, 3 and 4 connect scalar points.
/// A zero node grounds that end.
#[derive(Debug, Clone, PartialEq)]
pub struct Spring {
    pub kind: SpringKind,
    pub eid: u32,
    pub pid: Option<u32>,
    /// Stiffness on the card itself (kinds 2 and 4)
    pub k: Option<f64>,
    pub g1: u32,
    pub c1: String,
    pub g2: u32,
    pub c2: String,
    pub ge: Option<f64>,
    pub s: Option<f64>,
}

/// Scalar damper kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamperKind {
    Cdamp1,
    Cdamp2,
    Cdamp3,
    Cdamp4,
}

/// CDAMP1-4: scalar dampers
#[derive(Debug, Clone, PartialEq)]
pub struct Damper {
    pub kind: DamperKind,
    pub eid: u32,
    pub pid: Option<u32>,
    pub b: Option<f64>,
    pub g1: u32,
    pub c1: String,
    pub g2: u32,
    pub c2: String,
}

/// CGAP: gap element
#[derive(Debug, Clone, PartialEq)]
pub struct Gap {
    pub eid: u32,
    pub pid: u32,
    pub ga: u32,
    pub gb: u32,
    pub orient: Orientation,
    pub cid: Option<u32>,
}

/// CWELD: weld connector (essentials only, body verbatim)
#[derive(Debug, Clone, PartialEq)]
pub struct Weld {
    pub eid: u32,
    pub pid: u32,
    pub gs: Option<u32>,
    pub rest: Vec<Field>,
}

/// CFAST: fastener connector
#[derive(Debug, Clone, PartialEq)]
pub struct Fast {
    pub eid: u32,
    pub pid: u32,
    pub kind: Option<String>,
    pub ida: Option<u32>,
    pub idb: Option<u32>,
    pub gs: Option<u32>,
    pub ga: Option<u32>,
    pub gb: Option<u32>,
}

/// CVISC: viscous damper
#[derive(Debug, Clone, PartialEq)]
pub struct Visc {
    pub eid: u32,
    pub pid: u32,
    pub ga: u32,
    pub gb: u32,
}

/// CSHEAR: shear panel
#[derive(Debug, Clone, PartialEq)]
pub struct ShearPanel {
    pub eid: u32,
    pub pid: u32,
    pub nodes: [u32; 4],
}

/// PLOTEL: display-only line element
#[derive(Debug, Clone, PartialEq)]
pub struct Plotel {
    pub eid: u32,
    pub g1: u32,
    pub g2: u32,
}

/// CHBDYG / CHBDYE: heat boundary elements
#[derive(Debug, Clone, PartialEq)]
pub enum HeatBoundary {
    /// CHBDYG: surface by grid list
    Grids {
        eid: u32,
        surface_type: String,
        nodes: Vec<u32>,
    },
    /// CHBDYE: surface by element side
    ElementSide { eid: u32, eid2: u32, side: u32 },
}

impl Element {
    pub fn eid(&self) -> u32 {
        match self {
            Element::Shell(e) => e.eid,
            Element::Solid(e) => e.eid,
            Element::Bar(e) => e.eid,
            Element::Rod(e) => e.eid,
            Element::Conrod(e) => e.eid,
            Element::Bush(e) => e.eid,
            Element::Spring(e) => e.eid,
            Element::Damper(e) => e.eid,
            Element::Gap(e) => e.eid,
            Element::Weld(e) => e.eid,
            Element::Fast(e) => e.eid,
            Element::Visc(e) => e.eid,
            Element::Shear(e) => e.eid,
            Element::Plotel(e) => e.eid,
            Element::HeatBoundary(HeatBoundary::Grids { eid, .. }) => *eid,
            Element::HeatBoundary(HeatBoundary::ElementSide { eid, .. }) => *eid,
        }
    }

    pub fn set_eid(&mut self, new: u32) {
        match self {
            Element::Shell(e) => e.eid = new,
            Element::Solid(e) => e.eid = new,
            Element::Bar(e) => e.eid = new,
            Element::Rod(e) => e.eid = new,
            Element::Conrod(e) => e.eid = new,
            Element::Bush(e) => e.eid = new,
            Element::Spring(e) => e.eid = new,
            Element::Damper(e) => e.eid = new,
            Element::Gap(e) => e.eid = new,
            Element::Weld(e) => e.eid = new,
            Element::Fast(e) => e.eid = new,
            Element::Visc(e) => e.eid = new,
            Element::Shear(e) => e.eid = new,
            Element::Plotel(e) => e.eid = new,
            Element::HeatBoundary(HeatBoundary::Grids { eid, .. }) => *eid = new,
            Element::HeatBoundary(HeatBoundary::ElementSide { eid, .. }) => *eid = new,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Element::Shell(e) => e.kind.name(),
            Element::Solid(e) => e.kind.name(),
            Element::Bar(e) => {
                if e.beam {
                    "CBEAM"
                } else {
                    "CBAR"
                }
            }
            Element::Rod(_) => "CROD",
            Element::Conrod(_) => "CONROD",
            Element::Bush(_) => "CBUSH",
            Element::Spring(e) => match e.kind {
                SpringKind::Celas1 => "CELAS1",
                SpringKind::Celas2 => "CELAS2",
                SpringKind::Celas3 => "CELAS3",
                SpringKind::Celas4 => "CELAS4",
            },
            Element::Damper(e) => match e.kind {
                DamperKind::Cdamp1 => "CDAMP1",
                DamperKind::Cdamp2 => "CDAMP2",
                DamperKind::Cdamp3 => "CDAMP3",
                DamperKind::Cdamp4 => "CDAMP4",
            },
            Element::Gap(_) => "CGAP",
            Element::Weld(_) => "CWELD",
            Element::Fast(_) => "CFAST",
            Element::Visc(_) => "CVISC",
            Element::Shear(_) => "CSHEAR",
            Element::Plotel(_) => "PLOTEL",
            Element::HeatBoundary(HeatBoundary::Grids { .. }) => "CHBDYG",
            Element::HeatBoundary(HeatBoundary::ElementSide { .. }) => "CHBDYE",
        }
    }

    /// Property id; CONROD and PLOTEL have none
    pub fn pid(&self) -> Option<u32> {
        match self {
            Element::Shell(e) => Some(e.pid),
            Element::Solid(e) => Some(e.pid),
            Element::Bar(e) => Some(e.pid),
            Element::Rod(e) => Some(e.pid),
            Element::Conrod(_) => None,
            Element::Bush(e) => Some(e.pid),
            Element::Spring(e) => e.pid,
            Element::Damper(e) => e.pid,
            Element::Gap(e) => Some(e.pid),
            Element::Weld(e) => Some(e.pid),
            Element::Fast(e) => Some(e.pid),
            Element::Visc(e) => Some(e.pid),
            Element::Shear(e) => Some(e.pid),
            Element::Plotel(_) => None,
            Element::HeatBoundary(_) => None,
        }
    }

    /// Live node ids; zero and blank slots are excluded
    pub fn nodes(&self) -> Vec<u32> {
        let all: Vec<u32> = match self {
            Element::Shell(e) => e.nodes.clone(),
            Element::Solid(e) => e.nodes.clone(),
            Element::Bar(e) => vec![e.ga, e.gb],
            Element::Rod(e) => vec![e.ga, e.gb],
            Element::Conrod(e) => vec![e.ga, e.gb],
            Element::Bush(e) => {
                let mut nodes = vec![e.ga];
                nodes.extend(e.gb);
                nodes
            }
            Element::Spring(e) => vec![e.g1, e.g2],
            Element::Damper(e) => vec![e.g1, e.g2],
            Element::Gap(e) => vec![e.ga, e.gb],
            Element::Weld(e) => e.gs.into_iter().collect(),
            Element::Fast(e) => [e.gs, e.ga, e.gb].into_iter().flatten().collect(),
            Element::Visc(e) => vec![e.ga, e.gb],
            Element::Shear(e) => e.nodes.to_vec(),
            Element::Plotel(e) => vec![e.g1, e.g2],
            Element::HeatBoundary(HeatBoundary::Grids { nodes, .. }) => nodes.clone(),
            Element::HeatBoundary(HeatBoundary::ElementSide { .. }) => Vec::new(),
        };
        all.into_iter().filter(|&n| n > 0).collect()
    }

    pub(crate) fn parse(name: &str, fields: &Fields) -> Result<Self> {
        let element = match name {
            "CTRIA3" | "CTRIA6" | "CTRIAR" | "CQUAD4" | "CQUAD8" | "CQUADR" => {
                let kind = match name {
                    "CTRIA3" => ShellKind::Ctria3,
                    "CTRIA6" => ShellKind::Ctria6,
                    "CTRIAR" => ShellKind::Ctriar,
                    "CQUAD4" => ShellKind::Cquad4,
                    "CQUAD8" => ShellKind::Cquad8,
                    _ => ShellKind::Cquadr,
                };
                let count = kind.node_count();
                let mut nodes = Vec::with_capacity(count);
                for n in 0..count {
                    nodes.push(fields.uint_opt(2 + n)?.unwrap_or(0));
                }
                Element::Shell(Shell {
                    kind,
                    eid: fields.uint(0)?,
                    pid: fields.uint(1)?,
                    nodes,
                    theta_mcid: ThetaMcid::parse(fields, 2 + count)?,
                    zoffs: fields.real_opt(3 + count)?,
                    rest: fields.rest(4 + count),
                })
            }
            "CHEXA" | "CPENTA" | "CTETRA" => {
                let kind = match name {
                    "CHEXA" => SolidKind::Chexa,
                    "CPENTA" => SolidKind::Cpenta,
                    _ => SolidKind::Ctetra,
                };
                Element::Solid(Solid {
                    kind,
                    eid: fields.uint(0)?,
                    pid: fields.uint(1)?,
                    nodes: fields.id_list(2)?,
                })
            }
            "CBAR" | "CBEAM" => Element::Bar(Bar {
                beam: name == "CBEAM",
                eid: fields.uint(0)?,
                pid: fields.uint(1)?,
                ga: fields.uint(2)?,
                gb: fields.uint(3)?,
                orient: Orientation::parse(fields, 4)?,
                offt: fields.string(7),
                rest: fields.rest(8),
            }),
            "CROD" => Element::Rod(Rod {
                eid: fields.uint(0)?,
                pid: fields.uint(1)?,
                ga: fields.uint(2)?,
                gb: fields.uint(3)?,
            }),
            "CONROD" => Element::Conrod(Conrod {
                eid: fields.uint(0)?,
                ga: fields.uint(1)?,
                gb: fields.uint(2)?,
                mid: fields.uint(3)?,
                a: fields.real(4)?,
                j: fields.real_opt(5)?,
                c: fields.real_opt(6)?,
                nsm: fields.real(7)?,
            }),
            "CBUSH" => {
                // A zero g0 is kept distinct from a blank slot
                let orient = match fields.get(4) {
                    Field::Blank => BushOrient::Blank,
                    Field::Int(g0) if *g0 >= 0 => BushOrient::Node(*g0 as u32),
                    _ => BushOrient::Vector([
                        fields.real(4)?,
                        fields.real(5)?,
                        fields.real(6)?,
                    ]),
                };
                Element::Bush(Bush {
                    eid: fields.uint(0)?,
                    pid: fields.uint(1)?,
                    ga: fields.uint(2)?,
                    gb: fields.uint_opt(3)?.filter(|&g| g > 0),
                    orient,
                    cid: fields.uint_opt(7)?,
                    rest: fields.rest(8),
                })
            }
            "CELAS1" | "CELAS2" | "CELAS3" | "CELAS4" => {
                let kind = match name {
                    "CELAS1" => SpringKind::Celas1,
                    "CELAS2" => SpringKind::Celas2,
                    "CELAS3" => SpringKind::Celas3,
                    _ => SpringKind::Celas4,
                };
                let on_card = matches!(kind, SpringKind::Celas2 | SpringKind::Celas4);
                let scalar = matches!(kind, SpringKind::Celas3 | SpringKind::Celas4);
                let (g1, c1, g2, c2) = if scalar {
                    (
                        fields.uint_opt(2)?.unwrap_or(0),
                        String::new(),
                        fields.uint_opt(3)?.unwrap_or(0),
                        String::new(),
                    )
                } else {
                    (
                        fields.uint_opt(2)?.unwrap_or(0),
                        fields.dof(3)?,
                        fields.uint_opt(4)?.unwrap_or(0),
                        fields.dof(5)?,
                    )
                };
                Element::Spring(Spring {
                    kind,
                    eid: fields.uint(0)?,
                    pid: if on_card { None } else { Some(fields.uint(1)?) },
                    k: if on_card { Some(fields.real(1)?) } else { None },
                    g1,
                    c1,
                    g2,
                    c2,
                    ge: if kind == SpringKind::Celas2 {
                        fields.real_opt(6)?
                    } else {
                        None
                    },
                    s: if kind == SpringKind::Celas2 {
                        fields.real_opt(7)?
                    } else {
                        None
                    },
                })
            }
            "CDAMP1" | "CDAMP2" | "CDAMP3" | "CDAMP4" => {
                let kind = match name {
                    "CDAMP1" => DamperKind::Cdamp1,
                    "CDAMP2" => DamperKind::Cdamp2,
                    "CDAMP3" => DamperKind::Cdamp3,
                    _ => DamperKind::Cdamp4,
                };
                let on_card = matches!(kind, DamperKind::Cdamp2 | DamperKind::Cdamp4);
                let scalar = matches!(kind, DamperKind::Cdamp3 | DamperKind::Cdamp4);
                let (g1, c1, g2, c2) = if scalar {
                    (
                        fields.uint_opt(2)?.unwrap_or(0),
                        String::new(),
                        fields.uint_opt(3)?.unwrap_or(0),
                        String::new(),
                    )
                } else {
                    (
                        fields.uint_opt(2)?.unwrap_or(0),
                        fields.dof(3)?,
                        fields.uint_opt(4)?.unwrap_or(0),
                        fields.dof(5)?,
                    )
                };
                Element::Damper(Damper {
                    kind,
                    eid: fields.uint(0)?,
                    pid: if on_card { None } else { Some(fields.uint(1)?) },
                    b: if on_card { Some(fields.real(1)?) } else { None },
                    g1,
                    c1,
                    g2,
                    c2,
                })
            }
            "CGAP" => Element::Gap(Gap {
                eid: fields.uint(0)?,
                pid: fields.uint(1)?,
                ga: fields.uint(2)?,
                gb: fields.uint(3)?,
                orient: Orientation::parse(fields, 4)?,
                cid: fields.uint_opt(7)?,
            }),
            "CWELD" => Element::Weld(Weld {
                eid: fields.uint(0)?,
                pid: fields.uint(1)?,
                gs: fields.uint_opt(2)?,
                rest: fields.rest(3),
            }),
            "CFAST" => Element::Fast(Fast {
                eid: fields.uint(0)?,
                pid: fields.uint(1)?,
                kind: fields.string(2),
                ida: fields.uint_opt(3)?,
                idb: fields.uint_opt(4)?,
                gs: fields.uint_opt(5)?,
                ga: fields.uint_opt(6)?,
                gb: fields.uint_opt(7)?,
            }),
            "CVISC" => Element::Visc(Visc {
                eid: fields.uint(0)?,
                pid: fields.uint(1)?,
                ga: fields.uint(2)?,
                gb: fields.uint(3)?,
            }),
            "CSHEAR" => Element::Shear(ShearPanel {
                eid: fields.uint(0)?,
                pid: fields.uint(1)?,
                nodes: [
                    fields.uint(2)?,
                    fields.uint(3)?,
                    fields.uint(4)?,
                    fields.uint(5)?,
                ],
            }),
            "PLOTEL" => Element::Plotel(Plotel {
                eid: fields.uint(0)?,
                g1: fields.uint(1)?,
                g2: fields.uint(2)?,
            }),
            "CHBDYG" => Element::HeatBoundary(HeatBoundary::Grids {
                eid: fields.uint(0)?,
                surface_type: fields.string_or(2, "AREA4"),
                nodes: fields.id_list(8)?,
            }),
            "CHBDYE" => Element::HeatBoundary(HeatBoundary::ElementSide {
                eid: fields.uint(0)?,
                eid2: fields.uint(1)?,
                side: fields.uint_opt(2)?.unwrap_or(1),
            }),
            _ => return Err(fail(fields, 0, "element card")),
        };
        Ok(element)
    }

    pub fn write(&self) -> String {
        match self {
            Element::Shell(e) => {
                let mut fields: Vec<Field> = vec![e.eid.into(), e.pid.into()];
                fields.extend(e.nodes.iter().map(|&n| shell_node_field(n)));
                fields.push(ThetaMcid::field(&e.theta_mcid));
                fields.push(e.zoffs.into());
                fields.extend(e.rest.clone());
                write_card(e.kind.name(), fields)
            }
            Element::Solid(e) => {
                let mut fields: Vec<Field> = vec![e.eid.into(), e.pid.into()];
                fields.extend(e.nodes.iter().map(|&n| Field::from(n)));
                write_card(e.kind.name(), fields)
            }
            Element::Bar(e) => {
                let [x1, x2, x3] = e.orient.fields();
                let mut fields = vec![
                    e.eid.into(),
                    e.pid.into(),
                    e.ga.into(),
                    e.gb.into(),
                    x1,
                    x2,
                    x3,
                    e.offt.as_deref().into(),
                ];
                fields.extend(e.rest.clone());
                write_card(self.name(), fields)
            }
            Element::Rod(e) => write_card(
                "CROD",
                vec![e.eid.into(), e.pid.into(), e.ga.into(), e.gb.into()],
            ),
            Element::Conrod(e) => write_card(
                "CONROD",
                vec![
                    e.eid.into(),
                    e.ga.into(),
                    e.gb.into(),
                    e.mid.into(),
                    e.a.into(),
                    e.j.into(),
                    e.c.into(),
                    e.nsm.into(),
                ],
            ),
            Element::Bush(e) => {
                let [x1, x2, x3] = match &e.orient {
                    BushOrient::Blank => [Field::Blank, Field::Blank, Field::Blank],
                    BushOrient::Node(g0) => [(*g0).into(), Field::Blank, Field::Blank],
                    BushOrient::Vector(v) => [v[0].into(), v[1].into(), v[2].into()],
                };
                let mut fields = vec![
                    e.eid.into(),
                    e.pid.into(),
                    e.ga.into(),
                    e.gb.into(),
                    x1,
                    x2,
                    x3,
                    e.cid.into(),
                ];
                fields.extend(e.rest.clone());
                write_card("CBUSH", fields)
            }
            Element::Spring(e) => {
                let second: Field = match (e.pid, e.k) {
                    (Some(pid), _) => pid.into(),
                    (None, k) => k.into(),
                };
                let scalar = matches!(e.kind, SpringKind::Celas3 | SpringKind::Celas4);
                let mut fields = vec![e.eid.into(), second];
                if scalar {
                    fields.push(spring_node_field(e.g1));
                    fields.push(spring_node_field(e.g2));
                } else {
                    fields.push(spring_node_field(e.g1));
                    fields.push(dof_field(&e.c1));
                    fields.push(spring_node_field(e.g2));
                    fields.push(dof_field(&e.c2));
                }
                if e.kind == SpringKind::Celas2 {
                    fields.push(e.ge.into());
                    fields.push(e.s.into());
                }
                write_card(self.name(), fields)
            }
            Element::Damper(e) => {
                let second: Field = match (e.pid, e.b) {
                    (Some(pid), _) => pid.into(),
                    (None, b) => b.into(),
                };
                let scalar = matches!(e.kind, DamperKind::Cdamp3 | DamperKind::Cdamp4);
                let mut fields = vec![e.eid.into(), second];
                if scalar {
                    fields.push(spring_node_field(e.g1));
                    fields.push(spring_node_field(e.g2));
                } else {
                    fields.push(spring_node_field(e.g1));
                    fields.push(dof_field(&e.c1));
                    fields.push(spring_node_field(e.g2));
                    fields.push(dof_field(&e.c2));
                }
                write_card(self.name(), fields)
            }
            Element::Gap(e) => {
                let [x1, x2, x3] = e.orient.fields();
                write_card(
                    "CGAP",
                    vec![
                        e.eid.into(),
                        e.pid.into(),
                        e.ga.into(),
                        e.gb.into(),
                        x1,
                        x2,
                        x3,
                        e.cid.into(),
                    ],
                )
            }
            Element::Weld(e) => {
                let mut fields = vec![e.eid.into(), e.pid.into(), e.gs.into()];
                fields.extend(e.rest.clone());
                write_card("CWELD", fields)
            }
            Element::Fast(e) => write_card(
                "CFAST",
                vec![
                    e.eid.into(),
                    e.pid.into(),
                    e.kind.as_deref().into(),
                    e.ida.into(),
                    e.idb.into(),
                    e.gs.into(),
                    e.ga.into(),
                    e.gb.into(),
                ],
            ),
            Element::Visc(e) => write_card(
                "CVISC",
                vec![e.eid.into(), e.pid.into(), e.ga.into(), e.gb.into()],
            ),
            Element::Shear(e) => write_card(
                "CSHEAR",
                vec![
                    e.eid.into(),
                    e.pid.into(),
                    e.nodes[0].into(),
                    e.nodes[1].into(),
                    e.nodes[2].into(),
                    e.nodes[3].into(),
                ],
            ),
            Element::Plotel(e) => {
                write_card("PLOTEL", vec![e.eid.into(), e.g1.into(), e.g2.into()])
            }
            Element::HeatBoundary(HeatBoundary::Grids {
                eid,
                surface_type,
                nodes,
            }) => {
                let mut fields: Vec<Field> = vec![
                    (*eid).into(),
                    Field::Blank,
                    surface_type.as_str().into(),
                    Field::Blank,
                    Field::Blank,
                    Field::Blank,
                    Field::Blank,
                    Field::Blank,
                ];
                fields.extend(nodes.iter().map(|&n| Field::from(n)));
                write_card("CHBDYG", fields)
            }
            Element::HeatBoundary(HeatBoundary::ElementSide { eid, eid2, side }) => write_card(
                "CHBDYE",
                vec![(*eid).into(), (*eid2).into(), (*side).into()],
            ),
        }
    }
}

/// Mid-side zeros write back as blanks
fn shell_node_field(node: u32) -> Field {
    if node == 0 {
        Field::Blank
    } else {
        Field::Int(node as i64)
    }
}

/// Grounded scalar ends are explicit zeros on the card
fn spring_node_field(node: u32) -> Field {
    Field::Int(node as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::lex_card;

    fn reparse(element: &Element) -> Element {
        let text = element.write();
        let lines: Vec<(usize, &str)> =
            text.lines().enumerate().map(|(n, l)| (n + 1, l)).collect();
        Element::parse(element.name(), &lex_card(&lines).unwrap()).unwrap()
    }

    #[test]
    fn ctria3_roundtrip() {
        let fields = lex_card(&[(1, "CTRIA3         1       1       1       2       3")]).unwrap();
        let element = Element::parse("CTRIA3", &fields).unwrap();
        assert_eq!(element.nodes(), vec![1, 2, 3]);
        assert_eq!(element.pid(), Some(1));
        assert_eq!(element, reparse(&element));
    }

    #[test]
    fn cbar_orientation_vector() {
        let fields =
            lex_card(&[(1, "CBAR          10       5       1       2      0.      1.      0.")]).unwrap();
        let element = Element::parse("CBAR", &fields).unwrap();
        let Element::Bar(ref bar) = element else {
            panic!()
        };
        assert_eq!(bar.orient, Orientation::Vector([0.0, 1.0, 0.0]));
        assert_eq!(element, reparse(&element));
    }

    #[test]
    fn cbush_zero_g0_preserved() {
        let zero = lex_card(&[(1, "CBUSH          7     900     101     102       0")]).unwrap();
        let blank = lex_card(&[(1, "CBUSH          7     900     101     102")]).unwrap();
        let with_zero = Element::parse("CBUSH", &zero).unwrap();
        let with_blank = Element::parse("CBUSH", &blank).unwrap();
        assert_ne!(with_zero, with_blank);
        assert_eq!(with_zero, reparse(&with_zero));
        assert_eq!(with_blank, reparse(&with_blank));
    }

    #[test]
    fn celas2_grounded() {
        let fields = lex_card(&[(1, "CELAS2        20  1000.0     501       1       0")]).unwrap();
        let element = Element::parse("CELAS2", &fields).unwrap();
        let Element::Spring(ref spring) = element else {
            panic!()
        };
        assert_eq!(spring.k, Some(1000.0));
        assert_eq!(spring.g2, 0);
        assert_eq!(element.nodes(), vec![501]);
        assert_eq!(element, reparse(&element));
    }
}
