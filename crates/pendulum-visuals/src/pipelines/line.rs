use nalgebra as na;
use std::borrow::Cow;

use crate::render_window::{ActiveRenderWindow, RenderContext};

//
// user-facing parameters
//

/// Parameters for rendering operations that draw lines.
#[derive(Clone, Copy, Debug)]
pub struct LineParams {
    /// Width of the line, either in pixels or in scene units.
    /// Default: 1 screenspace pixel.
    pub width: LineWidth,
    /// Color of the line in linear sRGB space.
    /// Default: `palette::named::WHITE.into()`.
    pub color: palette::LinSrgb,
    /// The style of joins between line segments in a line strip.
    /// With circle joins, the ends of the strip are also rounded.
    /// Does nothing when drawing a line list.
    /// Default: `JoinStyle::Circle`.
    pub joins: JoinStyle,
}

impl Default for LineParams {
    fn default() -> Self {
        Self {
            width: LineWidth::ScreenPixels(1.0),
            color: palette::named::WHITE.into(),
            joins: JoinStyle::Circle,
        }
    }
}

/// The width of a line and which space it's defined in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineWidth {
    /// Keep a constant width in screen space regardless of window size.
    ScreenPixels(f32),
    /// Set the width in scene units, scaling with the window.
    WorldUnits(f32),
}

/// The shape to draw at the connection points between line segments in a line strip.
/// Currently only circle joins or none at all are supported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinStyle {
    /// Draw a circle between each line segment.
    Circle,
    /// Don't draw any joins.
    ///
    /// This generally looks ugly, but can be useful as an optimization
    /// if the lines you draw are thin enough not to see joins at all.
    None,
}

/// How to interpret point data given to the line renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LineDrawingMode {
    /// Every two points are a separate line segment with a gap between them.
    List,
    /// Every point is connected together with a line segment.
    Strip,
    /// Every point is a filled circle whose diameter is the line width.
    Points,
}

/// Number of segments drawn for the given mode and number of points.
pub(crate) fn segment_count(mode: LineDrawingMode, point_count: u32) -> u32 {
    match mode {
        LineDrawingMode::List => point_count / 2,
        LineDrawingMode::Strip => point_count.saturating_sub(1),
        LineDrawingMode::Points => 0,
    }
}

//
// renderer
//

/// An instanced line renderer.
///
/// Based on [this blog post by Rye Terrell].
/// (https://wwwtyro.net/2019/11/18/instanced-lines.html)
pub(crate) struct LinePipeline {
    // pipelines for different instance step modes
    pipelines: Pipelines,
    // geometry for segments and joins
    primitives: Primitives,
    // list of instance buffers and uniform bind groups,
    // one for each set of lines drawn within a frame,
    // to be able to draw all of them
    // without submitting commands for buffer writes between each draw
    instance_bufs: Vec<DynamicInstanceBuffer>,
    params_bind_group_layout: wgpu::BindGroupLayout,
    // keep track of how many draw calls have been made this frame
    // to decide which instance buffer to use
    next_draw_index: usize,
}

/// A collection of all the pipelines with different step modes and shaders.
struct Pipelines {
    // line segments, list and strip
    seg_list: wgpu::RenderPipeline,
    seg_strip: wgpu::RenderPipeline,
    // circles at single points
    point: wgpu::RenderPipeline,
}

/// A collection of all instance primitives we need
/// for line segments and circles.
struct Primitives {
    segment: InstanceGeometry,
    circle: InstanceGeometry,
}

impl Primitives {
    /// Generate vertex and index buffers for line segments and circles.
    fn generate_instance_geometry(device: &wgpu::Device) -> Self {
        // a line segment is just a rectangle
        // with coordinates chosen so that it's easy to transform
        // using the difference between two points and a thickness value
        let segment = InstanceGeometry::upload(
            device,
            "line segment",
            &[[0., 0.5], [0., -0.5], [1., -0.5], [1., 0.5]],
            &[0, 1, 2, 0, 2, 3],
        );

        // unit-diameter circle as a triangle fan
        let circle_vert_count = 24;
        let angle_increment = std::f32::consts::TAU / circle_vert_count as f32;
        let circle_verts: Vec<Vertex> = (0..circle_vert_count)
            .map(|i| {
                let angle = i as f32 * angle_increment;
                [0.5 * f32::cos(angle), 0.5 * f32::sin(angle)]
            })
            .collect();
        let circle_indices: Vec<u16> = (1..circle_vert_count - 1)
            .flat_map(|i| [0, i, i + 1])
            .collect();
        let circle = InstanceGeometry::upload(device, "circle", &circle_verts, &circle_indices);

        Self { segment, circle }
    }
}

/// Uniform parameters for the shaders.
#[derive(Clone, Copy, Debug, encase::ShaderType)]
struct ParamUniforms {
    // scaling in screenspace or worldspace
    // (corresponds to `ScalingMode` below,
    // but encase doesn't understand enums)
    scaling_mode: u32,
    width: f32,
    // note: this can't be a [f32; 4]
    // because encase will interpret it as a shader-side array
    color: na::Vector4<f32>,
}

impl ParamUniforms {
    fn new(params: &LineParams) -> Self {
        let (scaling_mode, width) = match params.width {
            LineWidth::WorldUnits(w) => (ScalingMode::WorldSpace, w),
            LineWidth::ScreenPixels(p) => (ScalingMode::ScreenSpace, p),
        };
        Self {
            scaling_mode: scaling_mode as u32,
            width,
            color: na::Vector4::new(params.color.red, params.color.green, params.color.blue, 1.0),
        }
    }
}

/// Line scaling in screenspace or worldspace
#[derive(Clone, Copy)]
enum ScalingMode {
    WorldSpace = 0,
    ScreenSpace = 1,
}

/// A vertex in the instance geometry.
type Vertex = [f32; 2];

/// Size in bytes of a single point in the instance buffer.
const POINT_SIZE: u64 = 2 * 4;

impl LinePipeline {
    pub fn new(window: &ActiveRenderWindow, res: &super::SharedResources) -> Self {
        let label = Some("line");

        let segment_shader = window
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label,
                source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!(
                    "../shaders/line_segment.wgsl"
                ))),
            });
        let circle_shader = window
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label,
                source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!(
                    "../shaders/circle.wgsl"
                ))),
            });

        // uniforms

        let params_buf_size = <ParamUniforms as encase::ShaderType>::min_size();
        let params_bind_group_layout =
            window
                .device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label,
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: Some(params_buf_size),
                        },
                        count: None,
                    }],
                });

        // pipeline

        let pipeline_layout =
            window
                .device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label,
                    bind_group_layouts: &[&res.frame_bind_group_layout, &params_bind_group_layout],
                    push_constant_ranges: &[],
                });

        let pipeline = |mode: LineDrawingMode| {
            use LineDrawingMode::*;
            let label = Some(match mode {
                List => "line list",
                Strip => "line strip",
                Points => "points",
            });
            let array_stride = match mode {
                // two points per step for line lists
                List => 2 * POINT_SIZE,
                // just one point for the rest,
                // since strips treat each point as both a start and an end
                Strip | Points => POINT_SIZE,
            };
            let attributes = match mode {
                List | Strip => [
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x2,
                        offset: 0,
                        shader_location: 1,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x2,
                        offset: POINT_SIZE,
                        shader_location: 2,
                    },
                ]
                .as_slice(),
                Points => [wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 1,
                }]
                .as_slice(),
            };
            let module = match mode {
                List | Strip => &segment_shader,
                Points => &circle_shader,
            };

            window
                .device
                .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label,
                    layout: Some(&pipeline_layout),
                    vertex: wgpu::VertexState {
                        module,
                        entry_point: "vs_main",
                        compilation_options: Default::default(),
                        buffers: &[
                            // vertices of a single primitive instance
                            wgpu::VertexBufferLayout {
                                // two floats for (x,y) coordinates
                                array_stride: POINT_SIZE,
                                step_mode: wgpu::VertexStepMode::Vertex,
                                attributes: &[wgpu::VertexAttribute {
                                    format: wgpu::VertexFormat::Float32x2,
                                    offset: 0,
                                    shader_location: 0,
                                }],
                            },
                            // points defining the instances
                            wgpu::VertexBufferLayout {
                                array_stride,
                                step_mode: wgpu::VertexStepMode::Instance,
                                attributes,
                            },
                        ],
                    },
                    fragment: Some(wgpu::FragmentState {
                        module: &segment_shader,
                        entry_point: "fs_main",
                        compilation_options: Default::default(),
                        targets: &[Some(window.swapchain_format().into())],
                    }),
                    primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::TriangleList,
                        front_face: wgpu::FrontFace::Ccw,
                        cull_mode: None,
                        ..Default::default()
                    },
                    depth_stencil: None,
                    multisample: window.multisample_state(),
                    multiview: None,
                    cache: None,
                })
        };

        Self {
            pipelines: Pipelines {
                seg_list: pipeline(LineDrawingMode::List),
                seg_strip: pipeline(LineDrawingMode::Strip),
                point: pipeline(LineDrawingMode::Points),
            },
            primitives: Primitives::generate_instance_geometry(&window.device),
            instance_bufs: Vec::new(),
            params_bind_group_layout,
            next_draw_index: 0,
        }
    }

    /// Upload point data and uniforms for the next draw call,
    /// reusing a buffer from earlier frames if one is available.
    fn upload_draw_data(
        &mut self,
        ctx: &mut RenderContext,
        params: ParamUniforms,
        points: &[[f32; 2]],
    ) -> bool {
        let mut params_bytes = encase::UniformBuffer::new(Vec::new());
        if let Err(err) = params_bytes.write(&params) {
            log::error!("Failed to encode line parameters: {err}");
            return false;
        }
        let params_bytes = params_bytes.into_inner();

        if self.next_draw_index >= self.instance_bufs.len() {
            // this is more than we've drawn in a frame before,
            // add another instance buffer
            self.instance_bufs.push(DynamicInstanceBuffer::write_new(
                ctx.device,
                &self.params_bind_group_layout,
                &params_bytes,
                bytemuck::cast_slice(points),
            ));
        } else {
            self.instance_bufs[self.next_draw_index].write(
                ctx,
                &params_bytes,
                bytemuck::cast_slice(points),
            );
        }
        true
    }

    /// Reset internal state between frames.
    pub fn end_frame(&mut self) {
        self.next_draw_index = 0;
    }

    pub fn draw(
        &mut self,
        res: &super::SharedResources,
        ctx: &mut RenderContext,
        params: LineParams,
        mode: LineDrawingMode,
        points: &[[f32; 2]],
    ) {
        let point_count = points.len() as u32;
        let segment_count = segment_count(mode, point_count);
        if point_count == 0 || (mode != LineDrawingMode::Points && segment_count == 0) {
            return;
        }

        if !self.upload_draw_data(ctx, ParamUniforms::new(&params), points) {
            return;
        }
        let instance = &self.instance_bufs[self.next_draw_index];

        let mut pass = ctx.pass("lines");
        pass.set_bind_group(0, &res.frame_bind_group, &[]);
        pass.set_bind_group(1, &instance.params_bind_group, &[]);
        pass.set_vertex_buffer(1, instance.point_buf.slice(..));

        // segments

        if segment_count > 0 {
            pass.set_pipeline(match mode {
                LineDrawingMode::List => &self.pipelines.seg_list,
                _ => &self.pipelines.seg_strip,
            });
            let idx_range = self.primitives.segment.bind(&mut pass);
            pass.draw_indexed(idx_range, 0, 0..segment_count);
        }

        // circles, either as the main content or as strip joins

        let draw_circles = match mode {
            LineDrawingMode::Points => true,
            LineDrawingMode::Strip => params.joins == JoinStyle::Circle,
            LineDrawingMode::List => false,
        };
        if draw_circles {
            pass.set_pipeline(&self.pipelines.point);
            let idx_range = self.primitives.circle.bind(&mut pass);
            pass.draw_indexed(idx_range, 0, 0..point_count);
        }

        drop(pass);
        self.next_draw_index += 1;
    }
}

//
// utility types
//

/// Vertex and index buffer to hold a mesh instance.
struct InstanceGeometry {
    vertex_buf: wgpu::Buffer,
    index_buf: wgpu::Buffer,
    index_count: u32,
}

impl InstanceGeometry {
    /// Upload vertices and indices to the GPU.
    fn upload(device: &wgpu::Device, label: &str, vertices: &[Vertex], indices: &[u16]) -> Self {
        use wgpu::util::DeviceExt;
        let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buf,
            index_buf,
            index_count: indices.len() as u32,
        }
    }

    /// Bind this instance's geometry to vertex buffer 0.
    /// Returns the index range to draw with for extra convenience.
    fn bind<'pass>(&'pass self, pass: &mut wgpu::RenderPass<'pass>) -> std::ops::Range<u32> {
        pass.set_vertex_buffer(0, self.vertex_buf.slice(..));
        pass.set_index_buffer(self.index_buf.slice(..), wgpu::IndexFormat::Uint16);
        0..self.index_count
    }
}

/// An instance buffer that is reallocated if it doesn't have enough capacity.
/// We keep a list of these for drawing multiple lines
/// without pausing to submit commands in between.
struct DynamicInstanceBuffer {
    point_buf: wgpu::Buffer,
    capacity: usize,
    params_buf: wgpu::Buffer,
    params_bind_group: wgpu::BindGroup,
}

impl DynamicInstanceBuffer {
    /// Write instance data to a new buffer.
    fn write_new(
        device: &wgpu::Device,
        params_bg_layout: &wgpu::BindGroupLayout,
        params_data: &[u8],
        point_data: &[u8],
    ) -> Self {
        use wgpu::util::DeviceExt;
        let point_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("line points"),
            contents: point_data,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let capacity = point_data.len();

        let params_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("line parameters"),
            contents: params_data,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let params_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("line parameters"),
            layout: params_bg_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: params_buf.as_entire_binding(),
            }],
        });

        Self {
            point_buf,
            capacity,
            params_buf,
            params_bind_group,
        }
    }

    /// Write instance data to an existing buffer, reallocating if necessary.
    fn write(&mut self, ctx: &mut RenderContext, params_data: &[u8], point_data: &[u8]) {
        if point_data.len() > self.capacity {
            // not enough capacity, reallocate
            use wgpu::util::DeviceExt;
            self.point_buf = ctx
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("line points"),
                    contents: point_data,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                });
            self.capacity = point_data.len();
        } else {
            ctx.queue.write_buffer(&self.point_buf, 0, point_data);
        }

        ctx.queue.write_buffer(&self.params_buf, 0, params_data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_counts() {
        assert_eq!(segment_count(LineDrawingMode::List, 4), 2);
        // a dangling point in a list is ignored
        assert_eq!(segment_count(LineDrawingMode::List, 5), 2);
        assert_eq!(segment_count(LineDrawingMode::Strip, 5), 4);
        assert_eq!(segment_count(LineDrawingMode::Strip, 1), 0);
        assert_eq!(segment_count(LineDrawingMode::Strip, 0), 0);
        assert_eq!(segment_count(LineDrawingMode::Points, 3), 0);
    }

    #[test]
    fn uniforms_follow_width_mode() {
        let screen = ParamUniforms::new(&LineParams::default());
        assert_eq!(screen.scaling_mode, ScalingMode::ScreenSpace as u32);
        assert_eq!(screen.width, 1.0);
        approx::assert_relative_eq!(
            screen.color,
            na::Vector4::new(1., 1., 1., 1.),
            epsilon = 1e-6
        );

        let world = ParamUniforms::new(&LineParams {
            width: LineWidth::WorldUnits(4.0),
            color: palette::LinSrgb::new(0.25, 0.5, 0.75),
            ..Default::default()
        });
        assert_eq!(world.scaling_mode, ScalingMode::WorldSpace as u32);
        assert_eq!(world.width, 4.0);
        assert_eq!(world.color, na::Vector4::new(0.25, 0.5, 0.75, 1.0));
    }
}
