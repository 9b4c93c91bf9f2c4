use std::str::FromStr;

use bitflags::bitflags;

use crate::error::SceneError;

bitflags! {
    /// Shading computations contributing to a fragment.
    ///
    /// Flags combine freely; the shader averages the outputs of every active
    /// mode. `NORMAL_MAPPING` does not produce a color on its own, it swaps
    /// the lighting normal for one sampled from the bound texture.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RenderingRouting: u32 {
        const LIGHTING = 1 << 0;
        const VERTEX = 1 << 1;
        const PURE = 1 << 2;
        const NORMAL = 1 << 3;
        const NORMAL_MAPPING = 1 << 4;
        const ARTIST = 1 << 5;
        const CUSTOM = 1 << 6;
        const TEXTURE = 1 << 8;
    }
}

impl Default for RenderingRouting {
    fn default() -> Self {
        RenderingRouting::LIGHTING
    }
}

/// Parses a comma separated list such as `"lighting,texture"`.
impl FromStr for RenderingRouting {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut routing = RenderingRouting::empty();
        for token in s.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            routing |= match token.to_ascii_lowercase().as_str() {
                "lighting" | "illumination" => RenderingRouting::LIGHTING,
                "vertex" => RenderingRouting::VERTEX,
                "pure" => RenderingRouting::PURE,
                "normal" => RenderingRouting::NORMAL,
                "normal_mapping" | "bump" => RenderingRouting::NORMAL_MAPPING,
                "artist" => RenderingRouting::ARTIST,
                "custom" => RenderingRouting::CUSTOM,
                "texture" => RenderingRouting::TEXTURE,
                _ => return Err(SceneError::UnknownRouting(token.to_string())),
            };
        }
        Ok(routing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_combined_routing() {
        let routing: RenderingRouting = "illumination, texture".parse().unwrap();
        assert_eq!(
            routing,
            RenderingRouting::LIGHTING | RenderingRouting::TEXTURE
        );
        assert_eq!("bump".parse::<RenderingRouting>().unwrap(), RenderingRouting::NORMAL_MAPPING);
    }

    #[test]
    fn test_parse_unknown_token() {
        let err = "lighting,glow".parse::<RenderingRouting>().unwrap_err();
        assert!(matches!(err, SceneError::UnknownRouting(t) if t == "glow"));
    }

    #[test]
    fn test_texture_bit_position() {
        assert_eq!(RenderingRouting::TEXTURE.bits(), 256);
        assert_eq!(RenderingRouting::default(), RenderingRouting::LIGHTING);
    }
}
