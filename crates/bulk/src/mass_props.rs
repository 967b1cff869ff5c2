//! Element mass properties
//!
//! Per-element mass from geometry plus property and material data:
//! shells as area times (rho t + nsm), solids as volume times rho, line
//! elements as length times (rho A + nsm). Positions are taken in the
//! basic frame. Section-library bars without an explicit area report no
//! mass rather than guessing.

// standard library
use std::collections::HashMap;

// crate modules
use crate::cards::{Element, MassElement, Property, ShellKind, SolidKind};
use crate::model::Model;

// external crates
use log::warn;
use nalgebra::Vector3;

/// `PARAM WTMASS`, defaulting to 1.0
pub fn wtmass(model: &Model) -> f64 {
    model.wtmass()
}

/// Mass of one structural element, where it can be computed
pub fn element_mass(model: &Model, element: &Element) -> Option<f64> {
    match element {
        Element::Shell(shell) => {
            let area = shell_area(model, &shell.nodes, shell.kind)?;
            let property = model.properties.get(&shell.pid)?;
            Some(area * shell_areal_density(model, property)?)
        }
        Element::Solid(solid) => {
            let volume = solid_volume(model, &solid.nodes, solid.kind)?;
            let property = model.properties.get(&solid.pid)?;
            let mid = property.mids().into_iter().next()?;
            let rho = model.materials.get(&mid)?.rho();
            Some(volume * rho)
        }
        Element::Bar(bar) => line_mass(model, bar.pid, bar.ga, bar.gb),
        Element::Rod(rod) => line_mass(model, rod.pid, rod.ga, rod.gb),
        Element::Conrod(conrod) => {
            let length = distance(model, conrod.ga, conrod.gb)?;
            let rho = model.materials.get(&conrod.mid)?.rho();
            Some(length * (rho * conrod.a + conrod.nsm))
        }
        // Springs, dampers, bushes, and friends carry no mass
        _ => None,
    }
}

/// Mass of one mass element, where the card carries a value
pub fn mass_element_mass(mass: &MassElement) -> Option<f64> {
    match mass {
        MassElement::Conm2(e) => Some(e.mass),
        // Translational term of the matrix
        MassElement::Conm1(e) => e.m.first().copied(),
        MassElement::Cmass2(e) => Some(e.mass),
        MassElement::Cmass4(e) => Some(e.mass),
        // Property-backed scalar masses are not resolved here
        MassElement::Cmass1(_) | MassElement::Cmass3(_) => None,
    }
}

/// Total computable mass per include file, keyed by file index
///
/// This is the breakdown behind the scale summary. Elements whose mass
/// cannot be computed (section-library bars, massless kinds) contribute
/// nothing and are counted once in a warning.
pub fn mass_by_file(model: &Model) -> HashMap<usize, f64> {
    let mut totals: HashMap<usize, f64> = HashMap::new();
    let mut unresolved = 0usize;

    for (eid, element) in &model.elements {
        let Some(file) = model.catalog.owner(crate::Family::Element, *eid) else {
            continue;
        };
        match element_mass(model, element) {
            Some(mass) => *totals.entry(file).or_default() += mass,
            None => {
                if !matches!(
                    element,
                    Element::Bush(_)
                        | Element::Spring(_)
                        | Element::Damper(_)
                        | Element::Gap(_)
                        | Element::Plotel(_)
                        | Element::Visc(_)
                        | Element::HeatBoundary(_)
                ) {
                    unresolved += 1;
                }
            }
        }
    }

    for (eid, mass) in &model.masses {
        let Some(file) = model.catalog.owner(crate::Family::Element, *eid) else {
            continue;
        };
        if let Some(value) = mass_element_mass(mass) {
            *totals.entry(file).or_default() += value;
        }
    }

    if unresolved > 0 {
        warn!("{unresolved} element(s) with no computable mass");
    }

    totals
}

/// Areal density of a shell property: rho t + nsm, plies summed for
/// composites
fn shell_areal_density(model: &Model, property: &Property) -> Option<f64> {
    match property {
        Property::Shell(p) => {
            let rho = p
                .mid1
                .and_then(|mid| model.materials.get(&mid))
                .map(|m| m.rho())
                .unwrap_or(0.0);
            Some(rho * p.t.unwrap_or(0.0) + p.nsm)
        }
        Property::Comp(p) => {
            let mut total = 0.0;
            for ply in &p.plies {
                let rho = model.materials.get(&ply.mid).map(|m| m.rho()).unwrap_or(0.0);
                total += rho * ply.t;
            }
            if p.lam.as_deref() == Some("SYM") {
                total *= 2.0;
            }
            Some(total + p.nsm)
        }
        Property::CompG(p) => {
            let mut total = 0.0;
            for ply in &p.plies {
                let rho = model.materials.get(&ply.mid).map(|m| m.rho()).unwrap_or(0.0);
                total += rho * ply.t;
            }
            Some(total + p.nsm)
        }
        _ => None,
    }
}

fn line_mass(model: &Model, pid: u32, ga: u32, gb: u32) -> Option<f64> {
    let length = distance(model, ga, gb)?;
    let property = model.properties.get(&pid)?;
    let area = property.area()?;
    let mid = property.mids().into_iter().next()?;
    let rho = model.materials.get(&mid)?.rho();
    Some(length * (rho * area + property.nsm().unwrap_or(0.0)))
}

fn position(model: &Model, nid: u32) -> Option<Vector3<f64>> {
    model.nodes.get(&nid)?.xyz().map(Vector3::from)
}

fn distance(model: &Model, ga: u32, gb: u32) -> Option<f64> {
    Some((position(model, gb)? - position(model, ga)?).norm())
}

fn shell_area(model: &Model, nodes: &[u32], kind: ShellKind) -> Option<f64> {
    let corners = kind.corner_count();
    let mut points = Vec::with_capacity(corners);
    for &nid in nodes.iter().take(corners) {
        points.push(position(model, nid)?);
    }
    match points.len() {
        3 => Some(triangle_area(points[0], points[1], points[2])),
        4 => Some(
            triangle_area(points[0], points[1], points[2])
                + triangle_area(points[0], points[2], points[3]),
        ),
        _ => None,
    }
}

fn triangle_area(a: Vector3<f64>, b: Vector3<f64>, c: Vector3<f64>) -> f64 {
    0.5 * (b - a).cross(&(c - a)).norm()
}

fn solid_volume(model: &Model, nodes: &[u32], kind: SolidKind) -> Option<f64> {
    let corners = kind.corner_count();
    if nodes.len() < corners {
        return None;
    }
    let mut p = Vec::with_capacity(corners);
    for &nid in nodes.iter().take(corners) {
        p.push(position(model, nid)?);
    }

    // Corner-based tet decompositions
    let tets: &[[usize; 4]] = match kind {
        SolidKind::Ctetra => &[[0, 1, 2, 3]],
        SolidKind::Cpenta => &[[0, 1, 2, 3], [1, 2, 3, 4], [2, 3, 4, 5]],
        SolidKind::Chexa => &[
            [0, 1, 3, 4],
            [1, 2, 3, 6],
            [1, 5, 6, 4],
            [3, 6, 7, 4],
            [1, 6, 3, 4],
        ],
    };

    let mut volume = 0.0;
    for tet in tets {
        volume += tet_volume(p[tet[0]], p[tet[1]], p[tet[2]], p[tet[3]]);
    }
    Some(volume)
}

fn tet_volume(a: Vector3<f64>, b: Vector3<f64>, c: Vector3<f64>, d: Vector3<f64>) -> f64 {
    ((b - a).cross(&(c - a)).dot(&(d - a)) / 6.0).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{read_deck_with, ReadOptions};
    use assert_fs::prelude::*;

    #[test]
    fn shell_mass() {
        let deck = "\
SOL 103
CEND
BEGIN BULK
GRID           1              0.      0.      0.
GRID           2              1.      0.      0.
GRID           3              0.      1.      0.
CTRIA3         1       1       1       2       3
PSHELL         1       1   0.005
MAT1           1  2.1+11             0.3   7850.
ENDDATA
";
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("model.bdf");
        file.write_str(deck).unwrap();

        let model = read_deck_with(
            file.path(),
            ReadOptions {
                disable_progress: true,
                ..Default::default()
            },
        )
        .unwrap();
        let element = model.elements.get(&1).unwrap();
        let mass = element_mass(&model, element).unwrap();
        // 0.5 m^2 * 0.005 m * 7850 kg/m^3
        assert!((mass - 19.625).abs() < 1e-9);
    }
}
