//! Built-in priority tables.
//!
//! Option lists follow the index order of the template option vectors.
//! Priority lists run from the most easily substituted option to the least;
//! options the lists leave out are unranked and never picked as a
//! substitute.

use crate::error::Result;

use super::table::PriorityTable;

pub const SHADER_FAMILY: &str = "shader";

const ALBEDO: &[&str] = &[
    "default",
    "detail_blend",
    "constant_color",
    "two_change_color",
    "four_change_color",
    "three_detail_blend",
    "two_detail_overlay",
    "two_detail",
    "color_mask",
    "two_detail_black_point",
    "two_change_color_anim_overlay",
    "chameleon",
    "two_change_color_chameleon",
    "chameleon_masked",
    "color_mask_hard_light",
    "two_change_color_tex_overlay",
    "chameleon_albedo_masked",
    "custom_cube",
    "two_color",
    "scrolling_cube_mask",
    "scrolling_cube",
    "scrolling_texture_uv",
    "texture_from_misc",
];

// Ranks are capped at 16, so the last seven albedo options are unranked.
const ALBEDO_PRIORITY: &[&str] = &[
    "default",
    "detail_blend",
    "constant_color",
    "two_change_color",
    "four_change_color",
    "three_detail_blend",
    "two_detail_overlay",
    "two_detail",
    "color_mask",
    "two_detail_black_point",
    "two_change_color_anim_overlay",
    "chameleon",
    "two_change_color_chameleon",
    "chameleon_masked",
    "color_mask_hard_light",
    "two_change_color_tex_overlay",
];

const BUMP_MAPPING: &[&str] = &[
    "off",
    "standard",
    "detail",
    "detail_masked",
    "detail_plus_detail_masked",
    "detail_unorm",
    "standard_wrinkle",
    "detail_wrinkle",
];

const ALPHA_TEST: &[&str] = &["none", "simple"];

const SPECULAR_MASK: &[&str] = &[
    "no_specular_mask",
    "specular_mask_from_diffuse",
    "specular_mask_from_texture",
    "specular_mask_from_color_texture",
    "specular_mask_mult_diffuse",
];

const SPECULAR_MASK_PRIORITY: &[&str] = &[
    "no_specular_mask",
    "specular_mask_from_diffuse",
    "specular_mask_mult_diffuse",
    "specular_mask_from_texture",
    "specular_mask_from_color_texture",
];

const MATERIAL_MODEL: &[&str] = &[
    "diffuse_only",
    "cook_torrance",
    "two_lobe_phong",
    "foliage",
    "none",
    "glass",
    "organism",
    "single_lobe_phong",
    "car_paint",
    "hair",
    "cook_torrance_custom_cube",
    "cook_torrance_pbr_maps",
    "cook_torrance_two_color_spec_tint",
    "cook_torrance_scrolling_cube",
    "cook_torrance_scrolling_cube_mask",
    "cook_torrance_rim_fresnel",
    "cook_torrance_from_albedo",
    "two_lobe_phong_tint_map",
];

// car_paint and hair have no stand-in and stay unranked.
const MATERIAL_MODEL_PRIORITY: &[&str] = &[
    "diffuse_only",
    "cook_torrance",
    "cook_torrance_custom_cube",
    "cook_torrance_pbr_maps",
    "cook_torrance_two_color_spec_tint",
    "cook_torrance_scrolling_cube",
    "cook_torrance_scrolling_cube_mask",
    "cook_torrance_rim_fresnel",
    "cook_torrance_from_albedo",
    "two_lobe_phong",
    "two_lobe_phong_tint_map",
    "foliage",
    "none",
    "glass",
    "organism",
    "single_lobe_phong",
];

const ENVIRONMENT_MAPPING: &[&str] = &[
    "none",
    "per_pixel",
    "dynamic",
    "from_flat_texture",
    "custom_map",
    "from_flat_texture_as_cubemap",
];

const ENVIRONMENT_MAPPING_PRIORITY: &[&str] = &[
    "none",
    "dynamic",
    "from_flat_texture",
    "per_pixel",
    "custom_map",
    "from_flat_texture_as_cubemap",
];

const SELF_ILLUMINATION: &[&str] = &[
    "off",
    "simple",
    "three_channel_self_illum",
    "plasma",
    "from_diffuse",
    "illum_detail",
    "meter",
    "self_illum_times_diffuse",
    "simple_with_alpha_mask",
    "simple_four_change_color",
    "illum_detail_world_space_four_cc",
    "illum_change_color",
    "multilayer_additive",
    "paletized_plasma",
    "illum_change_color_detail",
];

const SELF_ILLUMINATION_PRIORITY: &[&str] = &[
    "off",
    "simple",
    "three_channel_self_illum",
    "plasma",
    "from_diffuse",
    "illum_detail",
    "meter",
    "self_illum_times_diffuse",
    "simple_with_alpha_mask",
    "simple_four_change_color",
    "illum_detail_world_space_four_cc",
    "multilayer_additive",
    "paletized_plasma",
    "illum_change_color",
    "illum_change_color_detail",
];

const BLEND_MODE: &[&str] = &[
    "opaque",
    "additive",
    "multiply",
    "alpha_blend",
    "double_multiply",
    "pre_multiplied_alpha",
];

const BLEND_MODE_PRIORITY: &[&str] = &[
    "opaque",
    "additive",
    "multiply",
    "double_multiply",
    "pre_multiplied_alpha",
    "alpha_blend",
];

const PARALLAX: &[&str] = &["off", "simple", "interpolated", "simple_detail"];

const MISC: &[&str] = &[
    "first_person_never",
    "first_person_sometimes",
    "first_person_always",
    "first_person_never_with_rotating_bitmaps",
    "rotating_bitmaps_super_slow",
];

/// Least significant first. Material model decides the look the most, so a
/// substitute keeps it whenever any candidate can.
const SHADER_SIGNIFICANCE: &[&str] = &[
    "misc",
    "environment_mapping",
    "parallax",
    "bump_mapping",
    "blend_mode",
    "alpha_test",
    "self_illumination",
    "specular_mask",
    "albedo",
    "material_model",
];

/// Priority table of the standard `shader` template family.
pub fn shader_table() -> Result<PriorityTable> {
    PriorityTable::builder(SHADER_FAMILY)
        .dimension("albedo", ALBEDO, ALBEDO_PRIORITY)
        .dimension("bump_mapping", BUMP_MAPPING, BUMP_MAPPING)
        .dimension("alpha_test", ALPHA_TEST, ALPHA_TEST)
        .dimension("specular_mask", SPECULAR_MASK, SPECULAR_MASK_PRIORITY)
        .dimension("material_model", MATERIAL_MODEL, MATERIAL_MODEL_PRIORITY)
        .dimension("environment_mapping", ENVIRONMENT_MAPPING, ENVIRONMENT_MAPPING_PRIORITY)
        .dimension("self_illumination", SELF_ILLUMINATION, SELF_ILLUMINATION_PRIORITY)
        .dimension("blend_mode", BLEND_MODE, BLEND_MODE_PRIORITY)
        .dimension("parallax", PARALLAX, PARALLAX)
        .dimension("misc", MISC, MISC)
        .significance(SHADER_SIGNIFICANCE)
        .build()
}

/// Built-in table for a family name.
pub fn builtin_table(family: &str) -> Option<Result<PriorityTable>> {
    match family {
        SHADER_FAMILY => Some(shader_table()),
        _ => None,
    }
}
