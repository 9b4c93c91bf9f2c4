//! Phong material coefficients and their GPU layout.

use crate::error::SceneError;

/// GPU uniform data for a material
///
/// `params.x` holds the highlight exponent; the rest is padding.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub params: [f32; 4],
}

/// Ambient, diffuse and specular RGBA coefficients plus a highlight
/// (shininess) exponent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    ambient: [f32; 4],
    diffuse: [f32; 4],
    specular: [f32; 4],
    highlight: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: [0.0; 4],
            diffuse: [0.0; 4],
            specular: [0.0; 4],
            highlight: 32.0,
        }
    }
}

fn rgba(name: &'static str, values: &[f32]) -> Result<[f32; 4], SceneError> {
    let invalid = SceneError::InvalidVector { name, expected: 4 };
    let array: [f32; 4] = values.try_into().map_err(|_| invalid)?;
    if array.iter().all(|v| v.is_finite()) {
        Ok(array)
    } else {
        Err(SceneError::InvalidVector { name, expected: 4 })
    }
}

impl Material {
    pub fn new(ambient: [f32; 4], diffuse: [f32; 4], specular: [f32; 4], highlight: f32) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            highlight,
        }
    }

    /// Builds a material from slices, validating each one.
    pub fn from_slices(
        ambient: &[f32],
        diffuse: &[f32],
        specular: &[f32],
        highlight: f32,
    ) -> Result<Self, SceneError> {
        let mut material = Material::default();
        material.set_ambient(ambient)?;
        material.set_diffuse(diffuse)?;
        material.set_specular(specular)?;
        material.set_highlight(highlight)?;
        Ok(material)
    }

    pub fn ambient(&self) -> [f32; 4] {
        self.ambient
    }

    pub fn diffuse(&self) -> [f32; 4] {
        self.diffuse
    }

    pub fn specular(&self) -> [f32; 4] {
        self.specular
    }

    pub fn highlight(&self) -> f32 {
        self.highlight
    }

    pub fn set_ambient(&mut self, ambient: &[f32]) -> Result<(), SceneError> {
        self.ambient = rgba("ambient", ambient)?;
        Ok(())
    }

    pub fn set_diffuse(&mut self, diffuse: &[f32]) -> Result<(), SceneError> {
        self.diffuse = rgba("diffuse", diffuse)?;
        Ok(())
    }

    pub fn set_specular(&mut self, specular: &[f32]) -> Result<(), SceneError> {
        self.specular = rgba("specular", specular)?;
        Ok(())
    }

    pub fn set_highlight(&mut self, highlight: f32) -> Result<(), SceneError> {
        if !highlight.is_finite() {
            return Err(SceneError::InvalidVector {
                name: "highlight",
                expected: 1,
            });
        }
        self.highlight = highlight;
        Ok(())
    }

    pub fn to_uniform(&self) -> MaterialUniform {
        MaterialUniform {
            ambient: self.ambient,
            diffuse: self.diffuse,
            specular: self.specular,
            params: [self.highlight, 0.0, 0.0, 0.0],
        }
    }
}
