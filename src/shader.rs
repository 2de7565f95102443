//! GLSL sources for the water backdrop.
//!
//! `field` carries a host-side mirror of `FRAGMENT_SHADER`; constants that
//! appear in both must be changed together.

pub const VERTEX_SHADER: &str = r#"#version 300 es
in vec2 a_position;
void main() {
    gl_Position = vec4(a_position, 0.0, 1.0);
}
"#;

pub const FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;

uniform vec2 u_resolution;
uniform float u_time;
uniform float u_isDark;
uniform float u_fadeTop;
uniform float u_dpr;
uniform float u_hover;

out vec4 frag_color;

float hash(vec2 p) {
    return fract(sin(dot(p, vec2(127.1, 311.7))) * 43758.5453);
}

vec2 hash2(vec2 p) {
    p = vec2(dot(p, vec2(127.1, 311.7)), dot(p, vec2(269.5, 183.3)));
    return fract(sin(p) * 43758.5453);
}

// Value noise in [-1, 1].
float vnoise(vec2 p) {
    vec2 i = floor(p);
    vec2 f = fract(p);
    f = f * f * (3.0 - 2.0 * f);
    return mix(
        mix(hash(i), hash(i + vec2(1.0, 0.0)), f.x),
        mix(hash(i + vec2(0.0, 1.0)), hash(i + vec2(1.0, 1.0)), f.x),
        f.y
    ) * 2.0 - 1.0;
}

// x: summed field, y: share of the field contributed by accent cells.
vec2 metaball(vec2 p, float time) {
    vec2 i = floor(p);
    vec2 f = fract(p);
    float sum = 0.0;
    float accentSum = 0.0;
    for (int y = -1; y <= 1; y++) {
        for (int x = -1; x <= 1; x++) {
            vec2 neighbor = vec2(float(x), float(y));
            vec2 cellId = i + neighbor;
            vec2 point = 0.5 + 0.4 * sin(time * 0.3 + 6.28 * hash2(cellId));
            vec2 diff = neighbor + point - f;
            float influence = max(0.0, 1.0 - dot(diff, diff));
            float contrib = influence * influence * influence;
            sum += contrib;
            accentSum += contrib * step(0.92, hash(cellId + 0.5));
        }
    }
    return vec2(sum, sum > 0.0 ? accentSum / sum : 0.0);
}

vec2 warpCoords(vec2 p, float time) {
    float warp1 = vnoise(p * 0.5 + time * 0.05);
    float warp2 = vnoise(p * 0.3 - time * 0.03 + 100.0);
    return p + vec2(warp1, warp2) * 0.4;
}

void main() {
    vec2 p = gl_FragCoord.xy * 0.0133;

    vec3 bright = mix(vec3(0.1, 0.42, 0.7), vec3(0.32, 0.55, 0.82), u_isDark);
    vec3 dark = mix(vec3(0.04, 0.22, 0.44), vec3(0.12, 0.24, 0.4), u_isDark);
    vec3 pageBg = mix(vec3(1.0, 1.0, 1.0), vec3(0.106, 0.192, 0.337), u_isDark);
    vec3 accent = mix(vec3(0.804, 0.055, 0.055), vec3(1.0, 0.4, 0.4), u_isDark);

    float xCoord = gl_FragCoord.x / u_dpr;
    float amplitude = 25.0 * u_dpr;
    float boundary = 50.0 * u_dpr;
    boundary += vnoise(vec2(xCoord * 0.008, u_time * 0.08)) * amplitude;
    boundary += vnoise(vec2(xCoord * 0.02, u_time * 0.04 + 50.0)) * amplitude * 0.4;

    float pixelY = mix(gl_FragCoord.y, u_resolution.y - gl_FragCoord.y, u_fadeTop);
    float distToBoundary = pixelY - boundary;

    float wallInfluence = smoothstep(40.0 * u_dpr, 0.0, distToBoundary) * 0.25;

    vec2 p1 = p * 0.7 + vec2(u_time * 0.02, u_time * 0.015);
    vec2 meta1 = metaball(warpCoords(p1, u_time * 0.6), u_time * 0.6);
    vec2 p2 = p + vec2(u_time * 0.06, -u_time * 0.02);
    vec2 meta2 = metaball(warpCoords(p2 + 100.0, u_time), u_time);

    float taper = smoothstep(-30.0 * u_dpr, 0.0, distToBoundary);
    float field1 = (meta1.x + wallInfluence) * taper;
    float field2 = (meta2.x + wallInfluence) * taper;

    float aaWidth = 0.005 / max(u_dpr, 1.0);
    float blend1 = smoothstep(0.92 - aaWidth, 0.92 + aaWidth, field1);
    float blend2 = smoothstep(0.95 - aaWidth, 0.95 + aaWidth, field2);

    vec3 dark1 = mix(dark, accent, step(0.5, meta1.y) * u_hover);
    vec3 bright2 = mix(bright, accent, step(0.5, meta2.y) * u_hover);

    vec3 color = mix(pageBg, dark1, blend1);
    color = mix(color, bright2, blend2);
    frag_color = vec4(color, 1.0);
}
"#;

pub const ATTR_POSITION: &str = "a_position";

pub const U_RESOLUTION: &str = "u_resolution";
pub const U_TIME: &str = "u_time";
pub const U_IS_DARK: &str = "u_isDark";
pub const U_FADE_TOP: &str = "u_fadeTop";
pub const U_DPR: &str = "u_dpr";
pub const U_HOVER: &str = "u_hover";

/// Full-screen quad drawn as a 4-vertex triangle strip.
pub const QUAD_VERTICES: [f32; 8] = [-1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0];
