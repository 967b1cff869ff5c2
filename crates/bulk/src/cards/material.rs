//! Material cards

use crate::cards::{fail, write_card};
use crate::error::Result;
use crate::field::{Field, Fields};

/// A material definition
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Isotropic
    Mat1(Mat1),
    /// Anisotropic shell
    Mat2(Mat2),
    /// Orthotropic shell
    Mat8(Mat8),
    /// Anisotropic solid, full elasticity matrix
    Mat9(Mat9),
    /// Fluid
    Mat10(Mat10),
}

/// MAT1: isotropic elastic material
#[derive(Debug, Clone, PartialEq)]
pub struct Mat1 {
    pub mid: u32,
    pub e: Option<f64>,
    pub g: Option<f64>,
    pub nu: Option<f64>,
    pub rho: f64,
    pub a: Option<f64>,
    pub tref: Option<f64>,
    pub ge: Option<f64>,
    /// Stress allowables and material coordinate system
    pub st: Option<f64>,
    pub sc: Option<f64>,
    pub ss: Option<f64>,
    pub mcsid: Option<u32>,
}

/// MAT2: anisotropic shell material
#[derive(Debug, Clone, PartialEq)]
pub struct Mat2 {
    pub mid: u32,
    pub g11: f64,
    pub g12: f64,
    pub g13: f64,
    pub g22: f64,
    pub g23: f64,
    pub g33: f64,
    pub rho: f64,
    pub a1: Option<f64>,
    pub a2: Option<f64>,
    pub a3: Option<f64>,
    pub tref: Option<f64>,
    pub ge: Option<f64>,
    pub st: Option<f64>,
    pub sc: Option<f64>,
    pub ss: Option<f64>,
    pub mcsid: Option<u32>,
}

/// MAT8: orthotropic shell material
#[derive(Debug, Clone, PartialEq)]
pub struct Mat8 {
    pub mid: u32,
    pub e1: f64,
    pub e2: f64,
    pub nu12: f64,
    pub g12: Option<f64>,
    pub g1z: Option<f64>,
    pub g2z: Option<f64>,
    pub rho: f64,
    pub a1: Option<f64>,
    pub a2: Option<f64>,
    pub tref: Option<f64>,
    /// Strength allowables
    pub xt: Option<f64>,
    pub xc: Option<f64>,
    pub yt: Option<f64>,
    pub yc: Option<f64>,
    pub s: Option<f64>,
    pub ge: Option<f64>,
    pub f12: Option<f64>,
    pub strn: Option<f64>,
}

/// MAT9: anisotropic solid material, upper triangle of the 6x6 C matrix
#[derive(Debug, Clone, PartialEq)]
pub struct Mat9 {
    pub mid: u32,
    pub g: [f64; 21],
    pub rho: f64,
    pub a: [f64; 6],
    pub tref: Option<f64>,
    pub ge: Option<f64>,
}

/// MAT10: fluid material
#[derive(Debug, Clone, PartialEq)]
pub struct Mat10 {
    pub mid: u32,
    pub bulk: Option<f64>,
    pub rho: f64,
    pub c: Option<f64>,
    pub ge: Option<f64>,
}

impl Material {
    pub fn mid(&self) -> u32 {
        match self {
            Material::Mat1(m) => m.mid,
            Material::Mat2(m) => m.mid,
            Material::Mat8(m) => m.mid,
            Material::Mat9(m) => m.mid,
            Material::Mat10(m) => m.mid,
        }
    }

    pub fn set_mid(&mut self, mid: u32) {
        match self {
            Material::Mat1(m) => m.mid = mid,
            Material::Mat2(m) => m.mid = mid,
            Material::Mat8(m) => m.mid = mid,
            Material::Mat9(m) => m.mid = mid,
            Material::Mat10(m) => m.mid = mid,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Material::Mat1(_) => "MAT1",
            Material::Mat2(_) => "MAT2",
            Material::Mat8(_) => "MAT8",
            Material::Mat9(_) => "MAT9",
            Material::Mat10(_) => "MAT10",
        }
    }

    /// Mass density
    pub fn rho(&self) -> f64 {
        match self {
            Material::Mat1(m) => m.rho,
            Material::Mat2(m) => m.rho,
            Material::Mat8(m) => m.rho,
            Material::Mat9(m) => m.rho,
            Material::Mat10(m) => m.rho,
        }
    }

    pub fn rho_mut(&mut self) -> &mut f64 {
        match self {
            Material::Mat1(m) => &mut m.rho,
            Material::Mat2(m) => &mut m.rho,
            Material::Mat8(m) => &mut m.rho,
            Material::Mat9(m) => &mut m.rho,
            Material::Mat10(m) => &mut m.rho,
        }
    }

    pub(crate) fn parse(name: &str, fields: &Fields) -> Result<Self> {
        let material = match name {
            "MAT1" => Material::Mat1(Mat1 {
                mid: fields.uint(0)?,
                e: fields.real_opt(1)?,
                g: fields.real_opt(2)?,
                nu: fields.real_opt(3)?,
                rho: fields.real(4)?,
                a: fields.real_opt(5)?,
                tref: fields.real_opt(6)?,
                ge: fields.real_opt(7)?,
                st: fields.real_opt(8)?,
                sc: fields.real_opt(9)?,
                ss: fields.real_opt(10)?,
                mcsid: fields.uint_opt(11)?,
            }),
            "MAT2" => Material::Mat2(Mat2 {
                mid: fields.uint(0)?,
                g11: fields.real(1)?,
                g12: fields.real(2)?,
                g13: fields.real(3)?,
                g22: fields.real(4)?,
                g23: fields.real(5)?,
                g33: fields.real(6)?,
                rho: fields.real(7)?,
                a1: fields.real_opt(8)?,
                a2: fields.real_opt(9)?,
                a3: fields.real_opt(10)?,
                tref: fields.real_opt(11)?,
                ge: fields.real_opt(12)?,
                st: fields.real_opt(13)?,
                sc: fields.real_opt(14)?,
                ss: fields.real_opt(15)?,
                mcsid: fields.uint_opt(16)?,
            }),
            "MAT8" => Material::Mat8(Mat8 {
                mid: fields.uint(0)?,
                e1: fields.real(1)?,
                e2: fields.real(2)?,
                nu12: fields.real(3)?,
                g12: fields.real_opt(4)?,
                g1z: fields.real_opt(5)?,
                g2z: fields.real_opt(6)?,
                rho: fields.real(7)?,
                a1: fields.real_opt(8)?,
                a2: fields.real_opt(9)?,
                tref: fields.real_opt(10)?,
                xt: fields.real_opt(11)?,
                xc: fields.real_opt(12)?,
                yt: fields.real_opt(13)?,
                yc: fields.real_opt(14)?,
                s: fields.real_opt(15)?,
                ge: fields.real_opt(16)?,
                f12: fields.real_opt(17)?,
                strn: fields.real_opt(18)?,
            }),
            "MAT9" => {
                let mut g = [0.0; 21];
                for (n, slot) in g.iter_mut().enumerate() {
                    *slot = fields.real(1 + n)?;
                }
                let mut a = [0.0; 6];
                for (n, slot) in a.iter_mut().enumerate() {
                    *slot = fields.real(23 + n)?;
                }
                Material::Mat9(Mat9 {
                    mid: fields.uint(0)?,
                    g,
                    rho: fields.real(22)?,
                    a,
                    tref: fields.real_opt(29)?,
                    ge: fields.real_opt(30)?,
                })
            }
            "MAT10" => Material::Mat10(Mat10 {
                mid: fields.uint(0)?,
                bulk: fields.real_opt(1)?,
                rho: fields.real(2)?,
                c: fields.real_opt(3)?,
                ge: fields.real_opt(4)?,
            }),
            _ => return Err(fail(fields, 0, "material card")),
        };
        Ok(material)
    }

    pub fn write(&self) -> String {
        match self {
            Material::Mat1(m) => write_card(
                "MAT1",
                vec![
                    m.mid.into(),
                    m.e.into(),
                    m.g.into(),
                    m.nu.into(),
                    m.rho.into(),
                    m.a.into(),
                    m.tref.into(),
                    m.ge.into(),
                    m.st.into(),
                    m.sc.into(),
                    m.ss.into(),
                    m.mcsid.into(),
                ],
            ),
            Material::Mat2(m) => write_card(
                "MAT2",
                vec![
                    m.mid.into(),
                    m.g11.into(),
                    m.g12.into(),
                    m.g13.into(),
                    m.g22.into(),
                    m.g23.into(),
                    m.g33.into(),
                    m.rho.into(),
                    m.a1.into(),
                    m.a2.into(),
                    m.a3.into(),
                    m.tref.into(),
                    m.ge.into(),
                    m.st.into(),
                    m.sc.into(),
                    m.ss.into(),
                    m.mcsid.into(),
                ],
            ),
            Material::Mat8(m) => write_card(
                "MAT8",
                vec![
                    m.mid.into(),
                    m.e1.into(),
                    m.e2.into(),
                    m.nu12.into(),
                    m.g12.into(),
                    m.g1z.into(),
                    m.g2z.into(),
                    m.rho.into(),
                    m.a1.into(),
                    m.a2.into(),
                    m.tref.into(),
                    m.xt.into(),
                    m.xc.into(),
                    m.yt.into(),
                    m.yc.into(),
                    m.s.into(),
                    m.ge.into(),
                    m.f12.into(),
                    m.strn.into(),
                ],
            ),
            Material::Mat9(m) => {
                let mut fields: Vec<Field> = vec![m.mid.into()];
                fields.extend(m.g.iter().map(|&v| Field::from(v)));
                fields.push(m.rho.into());
                fields.extend(m.a.iter().map(|&v| Field::from(v)));
                fields.push(m.tref.into());
                fields.push(m.ge.into());
                write_card("MAT9", fields)
            }
            Material::Mat10(m) => write_card(
                "MAT10",
                vec![
                    m.mid.into(),
                    m.bulk.into(),
                    m.rho.into(),
                    m.c.into(),
                    m.ge.into(),
                ],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::lex_card;

    #[test]
    fn mat1_roundtrip() {
        let fields = lex_card(&[(1, "MAT1           1  2.1+11             0.3   7850.")]).unwrap();
        let material = Material::parse("MAT1", &fields).unwrap();
        let Material::Mat1(ref m) = material else {
            panic!()
        };
        assert_eq!(m.e, Some(2.1e11));
        assert_eq!(m.g, None);
        assert_eq!(m.rho, 7850.0);

        let text = material.write();
        let lines: Vec<(usize, &str)> =
            text.lines().enumerate().map(|(n, l)| (n + 1, l)).collect();
        let reparsed = Material::parse("MAT1", &lex_card(&lines).unwrap()).unwrap();
        assert_eq!(material, reparsed);
    }
}
