//! Attribute edit interface: named get/set access to plate attributes,
//! type- and length-checked against the existing value before mutation.
//! This is the contract surface toward the external edit tool.

use serde::{Deserialize, Serialize};

use plate_types::{Plane, Polyline};

use crate::plate::Plate;
use crate::types::ModelError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AttrValue {
    Scalar(f64),
    PlaneVal(Plane),
    Contour(Polyline),
    ContourList(Vec<Polyline>),
}

impl AttrValue {
    fn kind(&self) -> &'static str {
        match self {
            AttrValue::Scalar(_) => "scalar",
            AttrValue::PlaneVal(_) => "plane",
            AttrValue::Contour(_) => "contour",
            AttrValue::ContourList(_) => "contour list",
        }
    }
}

impl Plate {
    pub fn get_attr(&self, name: &str) -> Result<AttrValue, ModelError> {
        match name {
            "thickness" => Ok(AttrValue::Scalar(self.thickness)),
            "top_contour" => Ok(AttrValue::Contour(self.top_contour.clone())),
            "bottom_contour" => Ok(AttrValue::Contour(self.bottom_contour.clone())),
            "top_plane" => Ok(AttrValue::PlaneVal(self.top_plane)),
            "bottom_plane" => Ok(AttrValue::PlaneVal(self.bottom_plane)),
            "mid_plane" => Ok(AttrValue::PlaneVal(self.mid_plane)),
            "top_holes" => Ok(AttrValue::ContourList(self.top_holes.clone())),
            "bottom_holes" => Ok(AttrValue::ContourList(self.bottom_holes.clone())),
            _ => Err(ModelError::UnknownAttribute { name: name.into() }),
        }
    }

    pub fn set_attr(&mut self, name: &str, value: AttrValue) -> Result<(), ModelError> {
        let current = self.get_attr(name)?;
        if current.kind() != value.kind() {
            return Err(ModelError::AttributeTypeMismatch { name: name.into() });
        }
        if let (AttrValue::ContourList(cur), AttrValue::ContourList(new)) = (&current, &value) {
            if cur.len() != new.len() {
                return Err(ModelError::AttributeLengthMismatch {
                    name: name.into(),
                    expected: cur.len(),
                    got: new.len(),
                });
            }
        }

        match (name, value) {
            ("thickness", AttrValue::Scalar(v)) => self.thickness = v,
            ("top_contour", AttrValue::Contour(v)) => self.top_contour = v,
            ("bottom_contour", AttrValue::Contour(v)) => self.bottom_contour = v,
            ("top_plane", AttrValue::PlaneVal(v)) => self.top_plane = v,
            ("bottom_plane", AttrValue::PlaneVal(v)) => self.bottom_plane = v,
            ("mid_plane", AttrValue::PlaneVal(v)) => self.mid_plane = v,
            ("top_holes", AttrValue::ContourList(v)) => self.top_holes = v,
            ("bottom_holes", AttrValue::ContourList(v)) => self.bottom_holes = v,
            (name, _) => {
                return Err(ModelError::AttributeTypeMismatch { name: name.into() });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plate_kernel::{PlateKernel, PrismKernel, PrismSolid};
    use plate_types::{Point3d, Tolerance};

    fn sample_plate() -> Plate {
        let mut kernel = PrismKernel::new();
        let h = kernel.add_solid(
            PrismSolid::axis_box(Point3d::ORIGIN, Point3d::new(10.0, 5.0, 1.0)).unwrap(),
        );
        Plate::from_solid(&kernel, h, 0, &Tolerance::default()).unwrap()
    }

    #[test]
    fn get_and_set_round_trip() {
        let mut p = sample_plate();
        let v = p.get_attr("thickness").unwrap();
        assert!(matches!(v, AttrValue::Scalar(t) if (t - 1.0).abs() < 1e-9));
        p.set_attr("thickness", AttrValue::Scalar(2.0)).unwrap();
        assert!((p.thickness - 2.0).abs() < 1e-12);
    }

    #[test]
    fn type_mismatch_rejected() {
        let mut p = sample_plate();
        let err = p
            .set_attr("thickness", AttrValue::Contour(p.top_contour.clone()))
            .unwrap_err();
        assert!(matches!(err, ModelError::AttributeTypeMismatch { .. }));
    }

    #[test]
    fn list_length_mismatch_rejected() {
        let mut p = sample_plate();
        let err = p
            .set_attr(
                "top_holes",
                AttrValue::ContourList(vec![p.top_contour.clone()]),
            )
            .unwrap_err();
        assert!(matches!(err, ModelError::AttributeLengthMismatch { .. }));
    }

    #[test]
    fn unknown_attribute_rejected() {
        let p = sample_plate();
        assert!(matches!(
            p.get_attr("no_such"),
            Err(ModelError::UnknownAttribute { .. })
        ));
    }
}
