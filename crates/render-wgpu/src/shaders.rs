/// WGSL shader for instanced boxes with Blinn-Phong shading.
///
/// `MAX_LIGHTS` here must match [`crate::MAX_LIGHTS`].
pub const MESH_SHADER: &str = r#"
const MAX_LIGHTS: u32 = 4u;

struct Uniforms {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    light_count: vec4<u32>,
    light_dir: array<vec4<f32>, 4>,
    light_color: array<vec4<f32>, 4>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
    @location(7) specular: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) specular: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.color = instance.color;
    out.specular = instance.specular;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    let v = normalize(uniforms.camera_pos.xyz - in.world_pos);
    let shininess = in.specular.a;

    var lit = vec3<f32>(0.0, 0.0, 0.0);
    let count = min(uniforms.light_count.x, MAX_LIGHTS);
    for (var i = 0u; i < count; i = i + 1u) {
        let l = normalize(uniforms.light_dir[i].xyz);
        let radiance = uniforms.light_color[i].rgb;
        let diffuse = max(dot(n, l), 0.0);
        let h = normalize(l + v);
        let spec = select(0.0, pow(max(dot(n, h), 0.0), shininess), diffuse > 0.0);
        lit += radiance * (in.color.rgb * diffuse + in.specular.rgb * spec);
    }

    return vec4<f32>(lit, in.color.a);
}
"#;
