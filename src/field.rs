//! Host mirror of the water fragment shader.
//!
//! Evaluates the same math as `shader::FRAGMENT_SHADER` in `f32` so the
//! field can be inspected without a GPU. Results track the GPU closely but
//! not bit-for-bit: GLSL `sin` precision is driver defined.

pub type Vec2 = [f32; 2];
pub type Rgb = [f32; 3];

/// Shader constants. Defaults match the GLSL source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldParams {
    pub scale: f32,
    pub accent_threshold: f32,
    pub dark_threshold: f32,
    pub bright_threshold: f32,
    pub base_height: f32,
    pub wave_amplitude: f32,
    pub wall_range: f32,
    pub wall_strength: f32,
    pub taper_range: f32,
    pub aa_width: f32,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            scale: 0.0133,
            accent_threshold: 0.92,
            dark_threshold: 0.92,
            bright_threshold: 0.95,
            base_height: 50.0,
            wave_amplitude: 25.0,
            wall_range: 40.0,
            wall_strength: 0.25,
            taper_range: 30.0,
            aa_width: 0.005,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub bright: Rgb,
    pub dark: Rgb,
    pub page_bg: Rgb,
    pub accent: Rgb,
}

impl Palette {
    pub const LIGHT: Palette = Palette {
        bright: [0.1, 0.42, 0.7],
        dark: [0.04, 0.22, 0.44],
        page_bg: [1.0, 1.0, 1.0],
        accent: [0.804, 0.055, 0.055],
    };

    pub const DARK: Palette = Palette {
        bright: [0.32, 0.55, 0.82],
        dark: [0.12, 0.24, 0.4],
        page_bg: [0.106, 0.192, 0.337],
        accent: [1.0, 0.4, 0.4],
    };

    /// Linear blend keyed by the theme flag (0 = light, 1 = dark).
    pub fn for_theme(is_dark: f32) -> Palette {
        Palette {
            bright: mix3(Self::LIGHT.bright, Self::DARK.bright, is_dark),
            dark: mix3(Self::LIGHT.dark, Self::DARK.dark, is_dark),
            page_bg: mix3(Self::LIGHT.page_bg, Self::DARK.page_bg, is_dark),
            accent: mix3(Self::LIGHT.accent, Self::DARK.accent, is_dark),
        }
    }
}

/// Per-draw inputs, one field per shader uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldUniforms {
    pub resolution: Vec2,
    pub time: f32,
    pub is_dark: f32,
    pub fade_top: f32,
    pub dpr: f32,
    pub hover: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetaballSample {
    pub field: f32,
    pub accent_weight: f32,
}

fn fract(x: f32) -> f32 {
    x - x.floor()
}

fn dot(a: Vec2, b: Vec2) -> f32 {
    a[0] * b[0] + a[1] * b[1]
}

pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub fn mix3(a: Rgb, b: Rgb, t: f32) -> Rgb {
    [mix(a[0], b[0], t), mix(a[1], b[1], t), mix(a[2], b[2], t)]
}

/// GLSL `smoothstep`, including reversed edges.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// GLSL `step`.
pub fn step(edge: f32, x: f32) -> f32 {
    if x < edge {
        0.0
    } else {
        1.0
    }
}

pub fn hash(p: Vec2) -> f32 {
    fract((dot(p, [127.1, 311.7])).sin() * 43758.5453)
}

pub fn hash2(p: Vec2) -> Vec2 {
    [
        fract(dot(p, [127.1, 311.7]).sin() * 43758.5453),
        fract(dot(p, [269.5, 183.3]).sin() * 43758.5453),
    ]
}

/// Value noise in [-1, 1].
pub fn vnoise(p: Vec2) -> f32 {
    let i = [p[0].floor(), p[1].floor()];
    let f = [fract(p[0]), fract(p[1])];
    let u = [f[0] * f[0] * (3.0 - 2.0 * f[0]), f[1] * f[1] * (3.0 - 2.0 * f[1])];
    let bottom = mix(hash(i), hash([i[0] + 1.0, i[1]]), u[0]);
    let top = mix(hash([i[0], i[1] + 1.0]), hash([i[0] + 1.0, i[1] + 1.0]), u[0]);
    mix(bottom, top, u[1]) * 2.0 - 1.0
}

/// Whether a lattice cell may light up in the accent colour.
///
/// Depends only on the cell id, never on time.
pub fn is_accent_cell(cell: Vec2, params: &FieldParams) -> bool {
    step(params.accent_threshold, hash([cell[0] + 0.5, cell[1] + 0.5])) > 0.0
}

/// Cubic falloff of one cell's moving centre, seen from offset `f` inside
/// the cell `neighbor` steps away.
fn falloff(cell: Vec2, neighbor: Vec2, f: Vec2, time: f32) -> f32 {
    let seed = hash2(cell);
    let point = [
        0.5 + 0.4 * (time * 0.3 + 6.28 * seed[0]).sin(),
        0.5 + 0.4 * (time * 0.3 + 6.28 * seed[1]).sin(),
    ];
    let diff = [neighbor[0] + point[0] - f[0], neighbor[1] + point[1] - f[1]];
    let influence = (1.0 - dot(diff, diff)).max(0.0);
    influence * influence * influence
}

/// The share of the field at `p` contributed by a single lattice cell.
///
/// Its accent weight is all or nothing, decided by the cell id alone.
pub fn cell_sample(cell: Vec2, p: Vec2, time: f32, params: &FieldParams) -> MetaballSample {
    let i = [p[0].floor(), p[1].floor()];
    let f = [fract(p[0]), fract(p[1])];
    let field = falloff(cell, [cell[0] - i[0], cell[1] - i[1]], f, time);
    let accent_weight = if field > 0.0 && is_accent_cell(cell, params) {
        1.0
    } else {
        0.0
    };
    MetaballSample {
        field,
        accent_weight,
    }
}

/// Sum of cubic falloffs from the 3x3 neighbourhood of moving cell centres.
pub fn metaball(p: Vec2, time: f32, params: &FieldParams) -> MetaballSample {
    let i = [p[0].floor(), p[1].floor()];
    let f = [fract(p[0]), fract(p[1])];

    let mut sum = 0.0;
    let mut accent_sum = 0.0;
    for y in -1..=1 {
        for x in -1..=1 {
            let neighbor = [x as f32, y as f32];
            let cell = [i[0] + neighbor[0], i[1] + neighbor[1]];
            let contrib = falloff(cell, neighbor, f, time);
            sum += contrib;
            if is_accent_cell(cell, params) {
                accent_sum += contrib;
            }
        }
    }

    MetaballSample {
        field: sum,
        accent_weight: if sum > 0.0 { accent_sum / sum } else { 0.0 },
    }
}

pub fn warp_coords(p: Vec2, time: f32) -> Vec2 {
    let warp1 = vnoise([p[0] * 0.5 + time * 0.05, p[1] * 0.5 + time * 0.05]);
    let warp2 = vnoise([
        p[0] * 0.3 - time * 0.03 + 100.0,
        p[1] * 0.3 - time * 0.03 + 100.0,
    ]);
    [p[0] + warp1 * 0.4, p[1] + warp2 * 0.4]
}

/// Height in device pixels of the wavy baseline at a device-pixel column.
pub fn boundary_height(frag_x: f32, time: f32, dpr: f32, params: &FieldParams) -> f32 {
    let x = frag_x / dpr;
    let amplitude = params.wave_amplitude * dpr;
    params.base_height * dpr
        + vnoise([x * 0.008, time * 0.08]) * amplitude
        + vnoise([x * 0.02, time * 0.04 + 50.0]) * amplitude * 0.4
}

/// Extra field strength near the baseline so blobs pool against it.
pub fn wall_influence(dist_to_boundary: f32, dpr: f32, params: &FieldParams) -> f32 {
    smoothstep(params.wall_range * dpr, 0.0, dist_to_boundary) * params.wall_strength
}

/// Scales fields to zero below the baseline, leaving a small overhang.
pub fn taper(dist_to_boundary: f32, dpr: f32, params: &FieldParams) -> f32 {
    smoothstep(-params.taper_range * dpr, 0.0, dist_to_boundary)
}

/// Anti-aliased threshold; the band narrows as DPR grows.
pub fn coverage(field: f32, threshold: f32, dpr: f32, params: &FieldParams) -> f32 {
    let aa = params.aa_width / dpr.max(1.0);
    smoothstep(threshold - aa, threshold + aa, field)
}

/// Base colour pushed toward the accent when the blob is mostly accent cells.
pub fn layer_color(base: Rgb, accent: Rgb, accent_weight: f32, hover: f32) -> Rgb {
    mix3(base, accent, step(0.5, accent_weight) * hover)
}

/// Colour of one fragment, `frag` being the pixel centre in device pixels.
pub fn shade(frag: Vec2, uniforms: &FieldUniforms, params: &FieldParams) -> [f32; 4] {
    let FieldUniforms {
        resolution,
        time,
        is_dark,
        fade_top,
        dpr,
        hover,
    } = *uniforms;
    let palette = Palette::for_theme(is_dark);
    let p = [frag[0] * params.scale, frag[1] * params.scale];

    let boundary = boundary_height(frag[0], time, dpr, params);
    let pixel_y = mix(frag[1], resolution[1] - frag[1], fade_top);
    let dist = pixel_y - boundary;
    let wall = wall_influence(dist, dpr, params);

    let p1 = [p[0] * 0.7 + time * 0.02, p[1] * 0.7 + time * 0.015];
    let meta1 = metaball(warp_coords(p1, time * 0.6), time * 0.6, params);
    let p2 = [p[0] + time * 0.06 + 100.0, p[1] - time * 0.02 + 100.0];
    let meta2 = metaball(warp_coords(p2, time), time, params);

    let t = taper(dist, dpr, params);
    let field1 = (meta1.field + wall) * t;
    let field2 = (meta2.field + wall) * t;

    let blend1 = coverage(field1, params.dark_threshold, dpr, params);
    let blend2 = coverage(field2, params.bright_threshold, dpr, params);

    let dark1 = layer_color(palette.dark, palette.accent, meta1.accent_weight, hover);
    let bright2 = layer_color(palette.bright, palette.accent, meta2.accent_weight, hover);

    let color = mix3(mix3(palette.page_bg, dark1, blend1), bright2, blend2);
    [color[0], color[1], color[2], 1.0]
}
