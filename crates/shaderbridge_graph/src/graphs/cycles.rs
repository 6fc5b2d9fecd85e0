// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cycles shader vocabulary as exposed by Gaffer's Cycles shader loader.
//!
//! Slot names follow the Cycles node definitions. The source application's
//! socket labels are matched against these by the parameter translator;
//! label mismatches that normalization cannot bridge live in the label table
//! of the translator configuration, not here.

use crate::node::{NodeCategory, NodeRegistry, NodeSchema};
use crate::port::{Port, SocketType};
use crate::value::Value;

/// Socket kinds that have `convert_{from}_to_{to}` adapter nodes
pub const CONVERTER_KINDS: [&str; 4] = ["float", "int", "color", "vector"];

/// Name of the adapter node type converting between two socket types
pub fn converter_type_name(from: SocketType, to: SocketType) -> Option<String> {
    Some(format!("convert_{}_to_{}", from.converter_kind()?, to.converter_kind()?))
}

/// Input slot of an adapter node for a socket kind
pub fn converter_input_slot(kind: &str) -> String {
    format!("value_{kind}")
}

/// Output slot of an adapter node for a socket kind
pub fn converter_output_slot(kind: &str) -> String {
    format!("value_{kind}")
}

fn kind_socket_type(kind: &str) -> SocketType {
    match kind {
        "float" => SocketType::Float,
        "int" => SocketType::Int,
        "color" => SocketType::Color,
        _ => SocketType::Vector,
    }
}

/// Create the Cycles node registry with all available node types
pub fn create_cycles_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();

    // ========================================================================
    // Shader Nodes
    // ========================================================================

    registry.register(NodeSchema {
        id: "principled_bsdf".to_string(),
        name: "Principled BSDF".to_string(),
        category: NodeCategory::Shader,
        description: "Physically based layered surface".to_string(),
        inputs: vec![
            Port::input("base_color", SocketType::Color).with_default(Value::Color3([0.8, 0.8, 0.8])),
            Port::input("metallic", SocketType::Float).with_default(Value::Float(0.0)),
            Port::input("roughness", SocketType::Float).with_default(Value::Float(0.5)),
            Port::input("ior", SocketType::Float).with_default(Value::Float(1.5)),
            Port::input("alpha", SocketType::Float).with_default(Value::Float(1.0)),
            Port::input("normal", SocketType::Vector),
            Port::input("subsurface_weight", SocketType::Float),
            Port::input("subsurface_radius", SocketType::Vector),
            Port::input("subsurface_scale", SocketType::Float),
            Port::input("subsurface_ior", SocketType::Float),
            Port::input("subsurface_anisotropy", SocketType::Float),
            Port::input("specular_ior_level", SocketType::Float),
            Port::input("specular_tint", SocketType::Color),
            Port::input("anisotropic", SocketType::Float),
            Port::input("anisotropic_rotation", SocketType::Float),
            Port::input("tangent", SocketType::Vector),
            Port::input("transmission_weight", SocketType::Float),
            Port::input("coat_weight", SocketType::Float),
            Port::input("coat_roughness", SocketType::Float),
            Port::input("coat_ior", SocketType::Float),
            Port::input("coat_tint", SocketType::Color),
            Port::input("coat_normal", SocketType::Vector),
            Port::input("sheen_weight", SocketType::Float),
            Port::input("sheen_roughness", SocketType::Float),
            Port::input("sheen_tint", SocketType::Color),
            Port::input("emission_color", SocketType::Color),
            Port::input("emission_strength", SocketType::Float),
            Port::input("thin_film_thickness", SocketType::Float),
            Port::input("thin_film_ior", SocketType::Float),
            Port::input("distribution", SocketType::String),
            Port::input("subsurface_method", SocketType::String),
        ],
        outputs: vec![Port::output("bsdf", SocketType::Closure)],
    });

    registry.register(NodeSchema {
        id: "diffuse_bsdf".to_string(),
        name: "Diffuse BSDF".to_string(),
        category: NodeCategory::Shader,
        description: "Lambertian and Oren-Nayar diffuse reflection".to_string(),
        inputs: vec![
            Port::input("color", SocketType::Color).with_default(Value::Color3([0.8, 0.8, 0.8])),
            Port::input("roughness", SocketType::Float).with_default(Value::Float(0.0)),
            Port::input("normal", SocketType::Vector),
        ],
        outputs: vec![Port::output("bsdf", SocketType::Closure)],
    });

    registry.register(NodeSchema {
        id: "glossy_bsdf".to_string(),
        name: "Glossy BSDF".to_string(),
        category: NodeCategory::Shader,
        description: "Specular reflection with microfacet distribution".to_string(),
        inputs: vec![
            Port::input("color", SocketType::Color),
            Port::input("roughness", SocketType::Float),
            Port::input("anisotropy", SocketType::Float),
            Port::input("rotation", SocketType::Float),
            Port::input("tangent", SocketType::Vector),
            Port::input("normal", SocketType::Vector),
            Port::input("distribution", SocketType::String),
        ],
        outputs: vec![Port::output("bsdf", SocketType::Closure)],
    });

    registry.register(NodeSchema {
        id: "glass_bsdf".to_string(),
        name: "Glass BSDF".to_string(),
        category: NodeCategory::Shader,
        description: "Dielectric reflection and refraction".to_string(),
        inputs: vec![
            Port::input("color", SocketType::Color),
            Port::input("roughness", SocketType::Float),
            Port::input("ior", SocketType::Float).with_default(Value::Float(1.45)),
            Port::input("normal", SocketType::Vector),
            Port::input("distribution", SocketType::String),
        ],
        outputs: vec![Port::output("bsdf", SocketType::Closure)],
    });

    registry.register(NodeSchema {
        id: "refraction_bsdf".to_string(),
        name: "Refraction BSDF".to_string(),
        category: NodeCategory::Shader,
        description: "Glossy refraction".to_string(),
        inputs: vec![
            Port::input("color", SocketType::Color),
            Port::input("roughness", SocketType::Float),
            Port::input("ior", SocketType::Float),
            Port::input("normal", SocketType::Vector),
            Port::input("distribution", SocketType::String),
        ],
        outputs: vec![Port::output("bsdf", SocketType::Closure)],
    });

    registry.register(NodeSchema {
        id: "transparent_bsdf".to_string(),
        name: "Transparent BSDF".to_string(),
        category: NodeCategory::Shader,
        description: "Transparency without refraction".to_string(),
        inputs: vec![
            Port::input("color", SocketType::Color),
        ],
        outputs: vec![Port::output("bsdf", SocketType::Closure)],
    });

    registry.register(NodeSchema {
        id: "translucent_bsdf".to_string(),
        name: "Translucent BSDF".to_string(),
        category: NodeCategory::Shader,
        description: "Lambertian diffuse transmission".to_string(),
        inputs: vec![
            Port::input("color", SocketType::Color),
            Port::input("normal", SocketType::Vector),
        ],
        outputs: vec![Port::output("bsdf", SocketType::Closure)],
    });

    registry.register(NodeSchema {
        id: "subsurface_scattering".to_string(),
        name: "Subsurface Scattering".to_string(),
        category: NodeCategory::Shader,
        description: "Random walk subsurface scattering".to_string(),
        inputs: vec![
            Port::input("color", SocketType::Color),
            Port::input("scale", SocketType::Float),
            Port::input("radius", SocketType::Vector),
            Port::input("ior", SocketType::Float),
            Port::input("anisotropy", SocketType::Float),
            Port::input("normal", SocketType::Vector),
            Port::input("method", SocketType::String),
        ],
        outputs: vec![Port::output("bssrdf", SocketType::Closure)],
    });

    registry.register(NodeSchema {
        id: "emission".to_string(),
        name: "Emission".to_string(),
        category: NodeCategory::Shader,
        description: "Light emission".to_string(),
        inputs: vec![
            Port::input("color", SocketType::Color).with_default(Value::Color3([1.0, 1.0, 1.0])),
            Port::input("strength", SocketType::Float).with_default(Value::Float(1.0)),
        ],
        outputs: vec![Port::output("emission", SocketType::Closure)],
    });

    registry.register(NodeSchema {
        id: "background_shader".to_string(),
        name: "Background".to_string(),
        category: NodeCategory::Shader,
        description: "World background light".to_string(),
        inputs: vec![
            Port::input("color", SocketType::Color),
            Port::input("strength", SocketType::Float),
        ],
        outputs: vec![Port::output("background", SocketType::Closure)],
    });

    registry.register(NodeSchema {
        id: "holdout".to_string(),
        name: "Holdout".to_string(),
        category: NodeCategory::Shader,
        description: "Cuts a hole in the render".to_string(),
        inputs: vec![],
        outputs: vec![Port::output("holdout", SocketType::Closure)],
    });

    registry.register(NodeSchema {
        id: "mix_closure".to_string(),
        name: "Mix Shader".to_string(),
        category: NodeCategory::Shader,
        description: "Blend two closures".to_string(),
        inputs: vec![
            Port::input("fac", SocketType::Float).with_default(Value::Float(0.5)),
            Port::input("closure1", SocketType::Closure),
            Port::input("closure2", SocketType::Closure),
        ],
        outputs: vec![Port::output("closure", SocketType::Closure)],
    });

    registry.register(NodeSchema {
        id: "add_closure".to_string(),
        name: "Add Shader".to_string(),
        category: NodeCategory::Shader,
        description: "Sum two closures".to_string(),
        inputs: vec![
            Port::input("closure1", SocketType::Closure),
            Port::input("closure2", SocketType::Closure),
        ],
        outputs: vec![Port::output("closure", SocketType::Closure)],
    });

    registry.register(NodeSchema {
        id: "principled_volume".to_string(),
        name: "Principled Volume".to_string(),
        category: NodeCategory::Shader,
        description: "Combined volume scattering, absorption and emission".to_string(),
        inputs: vec![
            Port::input("color", SocketType::Color),
            Port::input("color_attribute", SocketType::String),
            Port::input("density", SocketType::Float),
            Port::input("density_attribute", SocketType::String),
            Port::input("anisotropy", SocketType::Float),
            Port::input("absorption_color", SocketType::Color),
            Port::input("emission_strength", SocketType::Float),
            Port::input("emission_color", SocketType::Color),
            Port::input("blackbody_intensity", SocketType::Float),
            Port::input("blackbody_tint", SocketType::Color),
            Port::input("temperature", SocketType::Float),
            Port::input("temperature_attribute", SocketType::String),
        ],
        outputs: vec![Port::output("volume", SocketType::Closure)],
    });

    registry.register(NodeSchema {
        id: "volume_absorption".to_string(),
        name: "Volume Absorption".to_string(),
        category: NodeCategory::Shader,
        description: "Volume light absorption".to_string(),
        inputs: vec![
            Port::input("color", SocketType::Color),
            Port::input("density", SocketType::Float),
        ],
        outputs: vec![Port::output("volume", SocketType::Closure)],
    });

    registry.register(NodeSchema {
        id: "volume_scatter".to_string(),
        name: "Volume Scatter".to_string(),
        category: NodeCategory::Shader,
        description: "Volume light scattering".to_string(),
        inputs: vec![
            Port::input("color", SocketType::Color),
            Port::input("density", SocketType::Float),
            Port::input("anisotropy", SocketType::Float),
        ],
        outputs: vec![Port::output("volume", SocketType::Closure)],
    });

    // ========================================================================
    // Texture Nodes
    // ========================================================================

    registry.register(NodeSchema {
        id: "image_texture".to_string(),
        name: "Image Texture".to_string(),
        category: NodeCategory::Texture,
        description: "Image lookup".to_string(),
        inputs: vec![
            Port::input("filename", SocketType::String),
            Port::input("colorspace", SocketType::String),
            Port::input("alpha_type", SocketType::String),
            Port::input("interpolation", SocketType::String),
            Port::input("projection", SocketType::String),
            Port::input("extension", SocketType::String),
            Port::input("projection_blend", SocketType::Float),
            Port::input("vector", SocketType::Vector),
        ],
        outputs: vec![
            Port::output("color", SocketType::Color),
            Port::output("alpha", SocketType::Float),
        ],
    });

    registry.register(NodeSchema {
        id: "environment_texture".to_string(),
        name: "Environment Texture".to_string(),
        category: NodeCategory::Texture,
        description: "Equirectangular or mirror ball image lookup".to_string(),
        inputs: vec![
            Port::input("filename", SocketType::String),
            Port::input("colorspace", SocketType::String),
            Port::input("alpha_type", SocketType::String),
            Port::input("interpolation", SocketType::String),
            Port::input("projection", SocketType::String),
            Port::input("vector", SocketType::Vector),
        ],
        outputs: vec![
            Port::output("color", SocketType::Color),
            Port::output("alpha", SocketType::Float),
        ],
    });

    registry.register(NodeSchema {
        id: "noise_texture".to_string(),
        name: "Noise Texture".to_string(),
        category: NodeCategory::Texture,
        description: "Fractal Perlin noise".to_string(),
        inputs: vec![
            Port::input("dimensions", SocketType::String),
            Port::input("type", SocketType::String),
            Port::input("normalize", SocketType::Bool),
            Port::input("vector", SocketType::Vector),
            Port::input("w", SocketType::Float),
            Port::input("scale", SocketType::Float).with_default(Value::Float(5.0)),
            Port::input("detail", SocketType::Float),
            Port::input("roughness", SocketType::Float),
            Port::input("lacunarity", SocketType::Float),
            Port::input("offset", SocketType::Float),
            Port::input("gain", SocketType::Float),
            Port::input("distortion", SocketType::Float),
        ],
        outputs: vec![
            Port::output("fac", SocketType::Float),
            Port::output("color", SocketType::Color),
        ],
    });

    registry.register(NodeSchema {
        id: "voronoi_texture".to_string(),
        name: "Voronoi Texture".to_string(),
        category: NodeCategory::Texture,
        description: "Worley noise".to_string(),
        inputs: vec![
            Port::input("dimensions", SocketType::String),
            Port::input("metric", SocketType::String),
            Port::input("feature", SocketType::String),
            Port::input("normalize", SocketType::Bool),
            Port::input("vector", SocketType::Vector),
            Port::input("w", SocketType::Float),
            Port::input("scale", SocketType::Float),
            Port::input("detail", SocketType::Float),
            Port::input("roughness", SocketType::Float),
            Port::input("lacunarity", SocketType::Float),
            Port::input("exponent", SocketType::Float),
            Port::input("smoothness", SocketType::Float),
            Port::input("randomness", SocketType::Float),
        ],
        outputs: vec![
            Port::output("distance", SocketType::Float),
            Port::output("color", SocketType::Color),
            Port::output("position", SocketType::Vector),
            Port::output("w", SocketType::Float),
            Port::output("radius", SocketType::Float),
        ],
    });

    registry.register(NodeSchema {
        id: "checker_texture".to_string(),
        name: "Checker Texture".to_string(),
        category: NodeCategory::Texture,
        description: "Checkerboard".to_string(),
        inputs: vec![
            Port::input("vector", SocketType::Vector),
            Port::input("color1", SocketType::Color),
            Port::input("color2", SocketType::Color),
            Port::input("scale", SocketType::Float),
        ],
        outputs: vec![
            Port::output("color", SocketType::Color),
            Port::output("fac", SocketType::Float),
        ],
    });

    registry.register(NodeSchema {
        id: "gradient_texture".to_string(),
        name: "Gradient Texture".to_string(),
        category: NodeCategory::Texture,
        description: "Interpolated gradients".to_string(),
        inputs: vec![
            Port::input("gradient_type", SocketType::String),
            Port::input("vector", SocketType::Vector),
        ],
        outputs: vec![
            Port::output("color", SocketType::Color),
            Port::output("fac", SocketType::Float),
        ],
    });

    registry.register(NodeSchema {
        id: "wave_texture".to_string(),
        name: "Wave Texture".to_string(),
        category: NodeCategory::Texture,
        description: "Bands and rings with noise distortion".to_string(),
        inputs: vec![
            Port::input("wave_type", SocketType::String),
            Port::input("bands_direction", SocketType::String),
            Port::input("rings_direction", SocketType::String),
            Port::input("profile", SocketType::String),
            Port::input("vector", SocketType::Vector),
            Port::input("scale", SocketType::Float),
            Port::input("distortion", SocketType::Float),
            Port::input("detail", SocketType::Float),
            Port::input("detail_scale", SocketType::Float),
            Port::input("detail_roughness", SocketType::Float),
            Port::input("phase", SocketType::Float),
        ],
        outputs: vec![
            Port::output("color", SocketType::Color),
            Port::output("fac", SocketType::Float),
        ],
    });

    registry.register(NodeSchema {
        id: "magic_texture".to_string(),
        name: "Magic Texture".to_string(),
        category: NodeCategory::Texture,
        description: "Psychedelic colour texture".to_string(),
        inputs: vec![
            Port::input("depth", SocketType::Int),
            Port::input("vector", SocketType::Vector),
            Port::input("scale", SocketType::Float),
            Port::input("distortion", SocketType::Float),
        ],
        outputs: vec![
            Port::output("color", SocketType::Color),
            Port::output("fac", SocketType::Float),
        ],
    });

    registry.register(NodeSchema {
        id: "white_noise_texture".to_string(),
        name: "White Noise Texture".to_string(),
        category: NodeCategory::Texture,
        description: "Random value per input".to_string(),
        inputs: vec![
            Port::input("dimensions", SocketType::String),
            Port::input("vector", SocketType::Vector),
            Port::input("w", SocketType::Float),
        ],
        outputs: vec![
            Port::output("value", SocketType::Float),
            Port::output("color", SocketType::Color),
        ],
    });

    // ========================================================================
    // Input Nodes
    // ========================================================================

    registry.register(NodeSchema {
        id: "texture_coordinate".to_string(),
        name: "Texture Coordinate".to_string(),
        category: NodeCategory::Input,
        description: "Standard texture coordinate spaces".to_string(),
        inputs: vec![
            Port::input("from_dupli", SocketType::Bool),
        ],
        outputs: vec![
            Port::output("generated", SocketType::Vector),
            Port::output("normal", SocketType::Vector),
            Port::output("uv", SocketType::Vector),
            Port::output("object", SocketType::Vector),
            Port::output("camera", SocketType::Vector),
            Port::output("window", SocketType::Vector),
            Port::output("reflection", SocketType::Vector),
        ],
    });

    registry.register(NodeSchema {
        id: "uvmap".to_string(),
        name: "UV Map".to_string(),
        category: NodeCategory::Input,
        description: "Named UV layer".to_string(),
        inputs: vec![
            Port::input("attribute", SocketType::String),
            Port::input("from_dupli", SocketType::Bool),
        ],
        outputs: vec![Port::output("uv", SocketType::Vector)],
    });

    registry.register(NodeSchema {
        id: "attribute".to_string(),
        name: "Attribute".to_string(),
        category: NodeCategory::Input,
        description: "Named geometry attribute".to_string(),
        inputs: vec![
            Port::input("attribute", SocketType::String),
        ],
        outputs: vec![
            Port::output("color", SocketType::Color),
            Port::output("vector", SocketType::Vector),
            Port::output("fac", SocketType::Float),
            Port::output("alpha", SocketType::Float),
        ],
    });

    registry.register(NodeSchema {
        id: "vertex_color".to_string(),
        name: "Color Attribute".to_string(),
        category: NodeCategory::Input,
        description: "Vertex colour layer".to_string(),
        inputs: vec![
            Port::input("layer_name", SocketType::String),
        ],
        outputs: vec![
            Port::output("color", SocketType::Color),
            Port::output("alpha", SocketType::Float),
        ],
    });

    registry.register(NodeSchema {
        id: "geometry".to_string(),
        name: "Geometry".to_string(),
        category: NodeCategory::Input,
        description: "Shading point geometry".to_string(),
        inputs: vec![],
        outputs: vec![
            Port::output("position", SocketType::Vector),
            Port::output("normal", SocketType::Vector),
            Port::output("tangent", SocketType::Vector),
            Port::output("true_normal", SocketType::Vector),
            Port::output("incoming", SocketType::Vector),
            Port::output("parametric", SocketType::Vector),
            Port::output("backfacing", SocketType::Float),
            Port::output("pointiness", SocketType::Float),
            Port::output("random_per_island", SocketType::Float),
        ],
    });

    registry.register(NodeSchema {
        id: "object_info".to_string(),
        name: "Object Info".to_string(),
        category: NodeCategory::Input,
        description: "Per-object data".to_string(),
        inputs: vec![],
        outputs: vec![
            Port::output("location", SocketType::Vector),
            Port::output("color", SocketType::Color),
            Port::output("alpha", SocketType::Float),
            Port::output("object_index", SocketType::Float),
            Port::output("material_index", SocketType::Float),
            Port::output("random", SocketType::Float),
        ],
    });

    registry.register(NodeSchema {
        id: "value".to_string(),
        name: "Value".to_string(),
        category: NodeCategory::Input,
        description: "Constant float".to_string(),
        inputs: vec![
            Port::input("value", SocketType::Float).with_default(Value::Float(0.0)),
        ],
        outputs: vec![Port::output("value", SocketType::Float)],
    });

    registry.register(NodeSchema {
        id: "color".to_string(),
        name: "RGB".to_string(),
        category: NodeCategory::Input,
        description: "Constant colour".to_string(),
        inputs: vec![
            Port::input("value", SocketType::Color).with_default(Value::Color3([0.5, 0.5, 0.5])),
        ],
        outputs: vec![Port::output("color", SocketType::Color)],
    });

    registry.register(NodeSchema {
        id: "fresnel".to_string(),
        name: "Fresnel".to_string(),
        category: NodeCategory::Input,
        description: "Dielectric fresnel weight".to_string(),
        inputs: vec![
            Port::input("ior", SocketType::Float),
            Port::input("normal", SocketType::Vector),
        ],
        outputs: vec![Port::output("fac", SocketType::Float)],
    });

    registry.register(NodeSchema {
        id: "layer_weight".to_string(),
        name: "Layer Weight".to_string(),
        category: NodeCategory::Input,
        description: "Fresnel and facing weights".to_string(),
        inputs: vec![
            Port::input("blend", SocketType::Float),
            Port::input("normal", SocketType::Vector),
        ],
        outputs: vec![
            Port::output("fresnel", SocketType::Float),
            Port::output("facing", SocketType::Float),
        ],
    });

    registry.register(NodeSchema {
        id: "blackbody".to_string(),
        name: "Blackbody".to_string(),
        category: NodeCategory::Input,
        description: "Colour of a black body at a temperature".to_string(),
        inputs: vec![
            Port::input("temperature", SocketType::Float),
        ],
        outputs: vec![Port::output("color", SocketType::Color)],
    });

    registry.register(NodeSchema {
        id: "wavelength".to_string(),
        name: "Wavelength".to_string(),
        category: NodeCategory::Input,
        description: "Colour of a light wavelength".to_string(),
        inputs: vec![
            Port::input("wavelength", SocketType::Float),
        ],
        outputs: vec![Port::output("color", SocketType::Color)],
    });

    // ========================================================================
    // Color Nodes
    // ========================================================================

    registry.register(NodeSchema {
        id: "mix".to_string(),
        name: "Mix RGB (legacy)".to_string(),
        category: NodeCategory::Color,
        description: "Legacy colour blend".to_string(),
        inputs: vec![
            Port::input("mix_type", SocketType::String),
            Port::input("use_clamp", SocketType::Bool),
            Port::input("fac", SocketType::Float),
            Port::input("color1", SocketType::Color),
            Port::input("color2", SocketType::Color),
        ],
        outputs: vec![Port::output("color", SocketType::Color)],
    });

    registry.register(NodeSchema {
        id: "mix_color".to_string(),
        name: "Mix Color".to_string(),
        category: NodeCategory::Color,
        description: "Blend two colours".to_string(),
        inputs: vec![
            Port::input("blend_type", SocketType::String),
            Port::input("use_clamp", SocketType::Bool),
            Port::input("use_clamp_result", SocketType::Bool),
            Port::input("factor", SocketType::Float).with_default(Value::Float(0.5)),
            Port::input("a", SocketType::Color),
            Port::input("b", SocketType::Color),
        ],
        outputs: vec![Port::output("result", SocketType::Color)],
    });

    registry.register(NodeSchema {
        id: "hsv".to_string(),
        name: "Hue/Saturation/Value".to_string(),
        category: NodeCategory::Color,
        description: "Hue, saturation and value adjustment".to_string(),
        inputs: vec![
            Port::input("hue", SocketType::Float),
            Port::input("saturation", SocketType::Float),
            Port::input("value", SocketType::Float),
            Port::input("fac", SocketType::Float),
            Port::input("color", SocketType::Color),
        ],
        outputs: vec![Port::output("color", SocketType::Color)],
    });

    registry.register(NodeSchema {
        id: "invert".to_string(),
        name: "Invert Color".to_string(),
        category: NodeCategory::Color,
        description: "Colour inversion".to_string(),
        inputs: vec![
            Port::input("fac", SocketType::Float),
            Port::input("color", SocketType::Color),
        ],
        outputs: vec![Port::output("color", SocketType::Color)],
    });

    registry.register(NodeSchema {
        id: "brightness_contrast".to_string(),
        name: "Brightness/Contrast".to_string(),
        category: NodeCategory::Color,
        description: "Brightness and contrast adjustment".to_string(),
        inputs: vec![
            Port::input("color", SocketType::Color),
            Port::input("bright", SocketType::Float),
            Port::input("contrast", SocketType::Float),
        ],
        outputs: vec![Port::output("color", SocketType::Color)],
    });

    registry.register(NodeSchema {
        id: "gamma".to_string(),
        name: "Gamma".to_string(),
        category: NodeCategory::Color,
        description: "Gamma correction".to_string(),
        inputs: vec![
            Port::input("color", SocketType::Color),
            Port::input("gamma", SocketType::Float),
        ],
        outputs: vec![Port::output("color", SocketType::Color)],
    });

    registry.register(NodeSchema {
        id: "rgb_ramp".to_string(),
        name: "Color Ramp".to_string(),
        category: NodeCategory::Color,
        description: "Gradient lookup".to_string(),
        inputs: vec![
            Port::input("ramp", SocketType::Ramp),
            Port::input("interpolation", SocketType::String),
            Port::input("fac", SocketType::Float),
        ],
        outputs: vec![
            Port::output("color", SocketType::Color),
            Port::output("alpha", SocketType::Float),
        ],
    });

    registry.register(NodeSchema {
        id: "float_curve".to_string(),
        name: "Float Curve".to_string(),
        category: NodeCategory::Color,
        description: "Scalar curve lookup".to_string(),
        inputs: vec![
            Port::input("curve", SocketType::Curve),
            Port::input("min_x", SocketType::Float).with_default(Value::Float(0.0)),
            Port::input("max_x", SocketType::Float).with_default(Value::Float(1.0)),
            Port::input("fac", SocketType::Float).with_default(Value::Float(1.0)),
            Port::input("value", SocketType::Float),
        ],
        outputs: vec![Port::output("value", SocketType::Float)],
    });

    // ========================================================================
    // Vector Nodes
    // ========================================================================

    registry.register(NodeSchema {
        id: "mapping".to_string(),
        name: "Mapping".to_string(),
        category: NodeCategory::Vector,
        description: "Transform a vector".to_string(),
        inputs: vec![
            Port::input("mapping_type", SocketType::String),
            Port::input("vector", SocketType::Vector),
            Port::input("location", SocketType::Vector),
            Port::input("rotation", SocketType::Vector),
            Port::input("scale", SocketType::Vector),
        ],
        outputs: vec![Port::output("vector", SocketType::Vector)],
    });

    registry.register(NodeSchema {
        id: "bump".to_string(),
        name: "Bump".to_string(),
        category: NodeCategory::Vector,
        description: "Height to normal perturbation".to_string(),
        inputs: vec![
            Port::input("invert", SocketType::Bool),
            Port::input("use_object_space", SocketType::Bool),
            Port::input("strength", SocketType::Float),
            Port::input("distance", SocketType::Float),
            Port::input("height", SocketType::Float),
            Port::input("normal", SocketType::Vector),
        ],
        outputs: vec![Port::output("normal", SocketType::Vector)],
    });

    registry.register(NodeSchema {
        id: "normal_map".to_string(),
        name: "Normal Map".to_string(),
        category: NodeCategory::Vector,
        description: "Tangent or object space normal map".to_string(),
        inputs: vec![
            Port::input("space", SocketType::String),
            Port::input("attribute", SocketType::String),
            Port::input("strength", SocketType::Float),
            Port::input("color", SocketType::Color),
        ],
        outputs: vec![Port::output("normal", SocketType::Vector)],
    });

    registry.register(NodeSchema {
        id: "displacement".to_string(),
        name: "Displacement".to_string(),
        category: NodeCategory::Vector,
        description: "Scalar height displacement".to_string(),
        inputs: vec![
            Port::input("space", SocketType::String),
            Port::input("height", SocketType::Float),
            Port::input("midlevel", SocketType::Float),
            Port::input("scale", SocketType::Float),
            Port::input("normal", SocketType::Vector),
        ],
        outputs: vec![Port::output("displacement", SocketType::Vector)],
    });

    registry.register(NodeSchema {
        id: "vector_displacement".to_string(),
        name: "Vector Displacement".to_string(),
        category: NodeCategory::Vector,
        description: "Vector displacement".to_string(),
        inputs: vec![
            Port::input("space", SocketType::String),
            Port::input("attribute", SocketType::String),
            Port::input("vector", SocketType::Color),
            Port::input("midlevel", SocketType::Float),
            Port::input("scale", SocketType::Float),
        ],
        outputs: vec![Port::output("displacement", SocketType::Vector)],
    });

    registry.register(NodeSchema {
        id: "vector_transform".to_string(),
        name: "Vector Transform".to_string(),
        category: NodeCategory::Vector,
        description: "Convert between world, object and camera space".to_string(),
        inputs: vec![
            Port::input("transform_type", SocketType::String),
            Port::input("convert_from", SocketType::String),
            Port::input("convert_to", SocketType::String),
            Port::input("vector", SocketType::Vector),
        ],
        outputs: vec![Port::output("vector", SocketType::Vector)],
    });

    registry.register(NodeSchema {
        id: "mix_vector".to_string(),
        name: "Mix Vector".to_string(),
        category: NodeCategory::Vector,
        description: "Blend two vectors by a scalar factor".to_string(),
        inputs: vec![
            Port::input("use_clamp", SocketType::Bool),
            Port::input("factor", SocketType::Float).with_default(Value::Float(0.5)),
            Port::input("a", SocketType::Vector),
            Port::input("b", SocketType::Vector),
        ],
        outputs: vec![Port::output("result", SocketType::Vector)],
    });

    registry.register(NodeSchema {
        id: "mix_vector_non_uniform".to_string(),
        name: "Mix Vector (Non-Uniform)".to_string(),
        category: NodeCategory::Vector,
        description: "Blend two vectors per component".to_string(),
        inputs: vec![
            Port::input("use_clamp", SocketType::Bool),
            Port::input("factor", SocketType::Vector),
            Port::input("a", SocketType::Vector),
            Port::input("b", SocketType::Vector),
        ],
        outputs: vec![Port::output("result", SocketType::Vector)],
    });

    // ========================================================================
    // Converter Nodes
    // ========================================================================

    registry.register(NodeSchema {
        id: "math".to_string(),
        name: "Math".to_string(),
        category: NodeCategory::Converter,
        description: "Scalar math".to_string(),
        inputs: vec![
            Port::input("math_type", SocketType::String),
            Port::input("use_clamp", SocketType::Bool),
            Port::input("value1", SocketType::Float),
            Port::input("value2", SocketType::Float),
            Port::input("value3", SocketType::Float),
        ],
        outputs: vec![Port::output("value", SocketType::Float)],
    });

    registry.register(NodeSchema {
        id: "vector_math".to_string(),
        name: "Vector Math".to_string(),
        category: NodeCategory::Converter,
        description: "Vector math".to_string(),
        inputs: vec![
            Port::input("math_type", SocketType::String),
            Port::input("vector1", SocketType::Vector),
            Port::input("vector2", SocketType::Vector),
            Port::input("vector3", SocketType::Vector),
            Port::input("scale", SocketType::Float),
        ],
        outputs: vec![
            Port::output("vector", SocketType::Vector),
            Port::output("value", SocketType::Float),
        ],
    });

    registry.register(NodeSchema {
        id: "mix_float".to_string(),
        name: "Mix Float".to_string(),
        category: NodeCategory::Converter,
        description: "Blend two floats".to_string(),
        inputs: vec![
            Port::input("use_clamp", SocketType::Bool),
            Port::input("factor", SocketType::Float).with_default(Value::Float(0.5)),
            Port::input("a", SocketType::Float),
            Port::input("b", SocketType::Float),
        ],
        outputs: vec![Port::output("result", SocketType::Float)],
    });

    registry.register(NodeSchema {
        id: "map_range".to_string(),
        name: "Map Range".to_string(),
        category: NodeCategory::Converter,
        description: "Remap a value between ranges".to_string(),
        inputs: vec![
            Port::input("range_type", SocketType::String),
            Port::input("clamp", SocketType::Bool),
            Port::input("value", SocketType::Float),
            Port::input("from_min", SocketType::Float),
            Port::input("from_max", SocketType::Float),
            Port::input("to_min", SocketType::Float),
            Port::input("to_max", SocketType::Float),
            Port::input("steps", SocketType::Float),
        ],
        outputs: vec![Port::output("result", SocketType::Float)],
    });

    registry.register(NodeSchema {
        id: "vector_map_range".to_string(),
        name: "Vector Map Range".to_string(),
        category: NodeCategory::Converter,
        description: "Remap a vector between ranges".to_string(),
        inputs: vec![
            Port::input("range_type", SocketType::String),
            Port::input("use_clamp", SocketType::Bool),
            Port::input("vector", SocketType::Vector),
            Port::input("from_min", SocketType::Vector),
            Port::input("from_max", SocketType::Vector),
            Port::input("to_min", SocketType::Vector),
            Port::input("to_max", SocketType::Vector),
            Port::input("steps", SocketType::Vector),
        ],
        outputs: vec![Port::output("vector", SocketType::Vector)],
    });

    registry.register(NodeSchema {
        id: "clamp".to_string(),
        name: "Clamp".to_string(),
        category: NodeCategory::Converter,
        description: "Clamp between bounds".to_string(),
        inputs: vec![
            Port::input("clamp_type", SocketType::String),
            Port::input("value", SocketType::Float),
            Port::input("min", SocketType::Float),
            Port::input("max", SocketType::Float),
        ],
        outputs: vec![Port::output("result", SocketType::Float)],
    });

    registry.register(NodeSchema {
        id: "rgb_to_bw".to_string(),
        name: "RGB to BW".to_string(),
        category: NodeCategory::Converter,
        description: "Colour to luminance".to_string(),
        inputs: vec![
            Port::input("color", SocketType::Color),
        ],
        outputs: vec![Port::output("val", SocketType::Float)],
    });

    registry.register(NodeSchema {
        id: "separate_xyz".to_string(),
        name: "Separate XYZ".to_string(),
        category: NodeCategory::Converter,
        description: "Split a vector".to_string(),
        inputs: vec![
            Port::input("vector", SocketType::Vector),
        ],
        outputs: vec![
            Port::output("x", SocketType::Float),
            Port::output("y", SocketType::Float),
            Port::output("z", SocketType::Float),
        ],
    });

    registry.register(NodeSchema {
        id: "combine_xyz".to_string(),
        name: "Combine XYZ".to_string(),
        category: NodeCategory::Converter,
        description: "Build a vector".to_string(),
        inputs: vec![
            Port::input("x", SocketType::Float),
            Port::input("y", SocketType::Float),
            Port::input("z", SocketType::Float),
        ],
        outputs: vec![Port::output("vector", SocketType::Vector)],
    });

    registry.register(NodeSchema {
        id: "separate_rgb".to_string(),
        name: "Separate RGB".to_string(),
        category: NodeCategory::Converter,
        description: "Split a colour".to_string(),
        inputs: vec![
            Port::input("color", SocketType::Color),
        ],
        outputs: vec![
            Port::output("r", SocketType::Float),
            Port::output("g", SocketType::Float),
            Port::output("b", SocketType::Float),
        ],
    });

    registry.register(NodeSchema {
        id: "combine_rgb".to_string(),
        name: "Combine RGB".to_string(),
        category: NodeCategory::Converter,
        description: "Build a colour".to_string(),
        inputs: vec![
            Port::input("r", SocketType::Float),
            Port::input("g", SocketType::Float),
            Port::input("b", SocketType::Float),
        ],
        outputs: vec![Port::output("image", SocketType::Color)],
    });

    registry.register(NodeSchema {
        id: "separate_color".to_string(),
        name: "Separate Color".to_string(),
        category: NodeCategory::Converter,
        description: "Split a colour in a colour model".to_string(),
        inputs: vec![
            Port::input("color_type", SocketType::String),
            Port::input("color", SocketType::Color),
        ],
        outputs: vec![
            Port::output("red", SocketType::Float),
            Port::output("green", SocketType::Float),
            Port::output("blue", SocketType::Float),
        ],
    });

    registry.register(NodeSchema {
        id: "combine_color".to_string(),
        name: "Combine Color".to_string(),
        category: NodeCategory::Converter,
        description: "Build a colour in a colour model".to_string(),
        inputs: vec![
            Port::input("color_type", SocketType::String),
            Port::input("red", SocketType::Float),
            Port::input("green", SocketType::Float),
            Port::input("blue", SocketType::Float),
        ],
        outputs: vec![Port::output("color", SocketType::Color)],
    });
    // ========================================================================
    // Adapter Nodes
    // ========================================================================

    for from in CONVERTER_KINDS {
        for to in CONVERTER_KINDS.iter().filter(|k| **k != from) {
            registry.register(NodeSchema {
                id: format!("convert_{from}_to_{to}"),
                name: format!("Convert {from} to {to}"),
                category: NodeCategory::Adapter,
                description: format!("Implicit {from} to {to} conversion"),
                inputs: vec![Port::input(converter_input_slot(from), kind_socket_type(from))],
                outputs: vec![Port::output(converter_output_slot(to), kind_socket_type(to))],
            });
        }
    }

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_core_shaders() {
        let registry = create_cycles_registry();
        let principled = registry.get("principled_bsdf").unwrap();
        assert_eq!(principled.input("base_color").unwrap().socket_type, SocketType::Color);
        assert_eq!(principled.output("bsdf").unwrap().socket_type, SocketType::Closure);
        assert!(registry.contains("image_texture"));
        assert!(registry.contains("rgb_ramp"));
        assert!(registry.contains("float_curve"));
    }

    #[test]
    fn test_multi_channel_curves_are_not_native() {
        let registry = create_cycles_registry();
        assert!(!registry.contains("rgb_curves"));
        assert!(!registry.contains("vector_curves"));
    }

    #[test]
    fn test_converters_registered_for_every_pair() {
        let registry = create_cycles_registry();
        assert_eq!(registry.types_in_category(NodeCategory::Adapter).count(), 12);
        let converter = registry.get("convert_float_to_color").unwrap();
        assert_eq!(converter.input("value_float").unwrap().socket_type, SocketType::Float);
        assert_eq!(converter.output("value_color").unwrap().socket_type, SocketType::Color);
        assert!(!registry.contains("convert_float_to_float"));
    }

    #[test]
    fn test_converter_names() {
        assert_eq!(
            converter_type_name(SocketType::Float, SocketType::Color).as_deref(),
            Some("convert_float_to_color")
        );
        assert_eq!(converter_type_name(SocketType::Closure, SocketType::Color), None);
        assert_eq!(
            converter_type_name(SocketType::String, SocketType::Float).as_deref(),
            Some("convert_string_to_float")
        );
    }
}
