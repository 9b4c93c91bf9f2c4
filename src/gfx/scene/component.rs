//! Scene graph nodes.
//!
//! A [`Component`] owns its children and an optional [`Drawable`]. Its local
//! state is a translation, three rotation axes with clamped angles, a uniform
//! scale and fixed pre/post rotations. The world transform is
//!
//! ```text
//! cumulative = parent * T * Post * R_u * R_v * R_w * Pre * S
//! ```
//!
//! in column-vector form: scale first, then pre-rotation, the `w`, `v` and
//! `u` rotations, post-rotation, translation and finally the parent. Every
//! mutating setter recomputes the subtree, reusing the parent transform
//! received on the last update.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use cgmath::{Matrix4, SquareMatrix, Vector3};

use super::Drawable;
use crate::error::SceneError;
use crate::gfx::rendering::{RenderFacade, RenderingRouting};
use crate::gfx::resources::{Material, Texture};
use crate::math::{transform, Point, Quaternion};

static NEXT_COMPONENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`Component`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u64);

impl ComponentId {
    fn next() -> Self {
        ComponentId(NEXT_COMPONENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One of the three local rotation axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    U,
    V,
    W,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::U => 0,
            Axis::V => 1,
            Axis::W => 2,
        }
    }
}

/// Names a rotation axis of one specific component.
///
/// Handles compare by owner and axis, never by direction, so two axes that
/// happen to point the same way stay distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxisHandle {
    owner: ComponentId,
    axis: Axis,
}

impl AxisHandle {
    pub fn owner(&self) -> ComponentId {
        self.owner
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }
}

/// What [`Component::reset`] restores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetMode {
    Angle,
    Position,
    Scale,
    RotationAxis,
    All,
}

impl ResetMode {
    fn covers(self, other: ResetMode) -> bool {
        self == ResetMode::All || self == other
    }
}

impl FromStr for ResetMode {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "angle" => Ok(ResetMode::Angle),
            "position" => Ok(ResetMode::Position),
            "scale" => Ok(ResetMode::Scale),
            "rotationAxis" => Ok(ResetMode::RotationAxis),
            "all" => Ok(ResetMode::All),
            other => Err(SceneError::UnknownResetMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct AxisState {
    direction: Vector3<f32>,
    angle: f32,
    default_angle: f32,
    range: [f32; 2],
}

impl AxisState {
    const DEFAULT_RANGE: [f32; 2] = [-360.0, 360.0];

    fn new(direction: Vector3<f32>) -> Self {
        Self {
            direction,
            angle: 0.0,
            default_angle: 0.0,
            range: Self::DEFAULT_RANGE,
        }
    }

    fn clamp(&self, angle: f32) -> f32 {
        angle.max(self.range[0]).min(self.range[1])
    }

    fn quaternion(&self) -> Quaternion {
        Quaternion::from_axis_angle(self.direction, self.angle)
    }
}

const DEFAULT_AXES: [Vector3<f32>; 3] = [
    Vector3::new(1.0, 0.0, 0.0),
    Vector3::new(0.0, 1.0, 0.0),
    Vector3::new(0.0, 0.0, 1.0),
];

fn vector3(p: &Point) -> Result<Vector3<f32>, SceneError> {
    Vector3::try_from(p).map_err(|_| SceneError::DimensionMismatch {
        expected: 3,
        found: p.dim(),
    })
}

fn uniform_scale(scale: &[f32]) -> Result<[f32; 3], SceneError> {
    let scale: [f32; 3] = scale
        .try_into()
        .map_err(|_| SceneError::DimensionMismatch {
            expected: 3,
            found: scale.len(),
        })?;
    if scale[0] != scale[1] || scale[1] != scale[2] {
        return Err(SceneError::NonUniformScale(scale));
    }
    Ok(scale)
}

/// A node of the scene graph.
pub struct Component {
    id: ComponentId,
    current_pos: Vector3<f32>,
    default_pos: Vector3<f32>,
    axes: [AxisState; 3],
    current_scale: [f32; 3],
    default_scale: [f32; 3],
    pre_rotation: Matrix4<f32>,
    post_rotation: Matrix4<f32>,
    material: Material,
    texture: Option<Texture>,
    texture_enabled: bool,
    routing: RenderingRouting,
    children: Vec<Component>,
    drawable: Option<Box<dyn Drawable>>,
    parent_transform: Matrix4<f32>,
    transform: Matrix4<f32>,
}

impl Component {
    /// Creates a node at `position` relative to its parent's origin.
    pub fn new(position: &Point, drawable: Option<Box<dyn Drawable>>) -> Result<Self, SceneError> {
        let position = vector3(position)?;
        let mut component = Self {
            id: ComponentId::next(),
            current_pos: position,
            default_pos: position,
            axes: DEFAULT_AXES.map(AxisState::new),
            current_scale: [1.0; 3],
            default_scale: [1.0; 3],
            pre_rotation: Matrix4::identity(),
            post_rotation: Matrix4::identity(),
            material: Material::default(),
            texture: None,
            texture_enabled: false,
            routing: RenderingRouting::default(),
            children: Vec::new(),
            drawable,
            parent_transform: Matrix4::identity(),
            transform: Matrix4::identity(),
        };
        component.update();
        Ok(component)
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    // Tree structure

    /// Appends `child` unless a child with the same id is already present.
    pub fn add_child(&mut self, child: Component) -> ComponentId {
        let id = child.id;
        if self.children.iter().any(|c| c.id == id) {
            log::debug!("Component {} already has child {}", self.id, id);
            return id;
        }
        self.children.push(child);
        let parent = self.transform;
        if let Some(child) = self.children.last_mut() {
            child.update_with_parent(parent);
        }
        id
    }

    pub fn children(&self) -> &[Component] {
        &self.children
    }

    /// Detaches and drops every descendant.
    pub fn clear(&mut self) {
        for child in &mut self.children {
            child.clear();
        }
        self.children.clear();
    }

    /// Depth-first search of this subtree.
    pub fn find(&self, id: ComponentId) -> Option<&Component> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    pub fn find_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    // Axes

    fn handle(&self, axis: Axis) -> AxisHandle {
        AxisHandle {
            owner: self.id,
            axis,
        }
    }

    pub fn u_axis(&self) -> AxisHandle {
        self.handle(Axis::U)
    }

    pub fn v_axis(&self) -> AxisHandle {
        self.handle(Axis::V)
    }

    pub fn w_axis(&self) -> AxisHandle {
        self.handle(Axis::W)
    }

    pub fn u(&self) -> Vector3<f32> {
        self.axes[0].direction
    }

    pub fn v(&self) -> Vector3<f32> {
        self.axes[1].direction
    }

    pub fn w(&self) -> Vector3<f32> {
        self.axes[2].direction
    }

    fn axis_index(&self, handle: AxisHandle) -> Result<usize, SceneError> {
        if handle.owner != self.id {
            return Err(SceneError::UnknownAxis(self.id));
        }
        Ok(handle.axis.index())
    }

    pub fn angle(&self, handle: AxisHandle) -> Result<f32, SceneError> {
        Ok(self.axes[self.axis_index(handle)?].angle)
    }

    pub fn range(&self, handle: AxisHandle) -> Result<[f32; 2], SceneError> {
        Ok(self.axes[self.axis_index(handle)?].range)
    }

    /// Sets the angle in degrees, clamped to the axis range.
    pub fn set_current_angle(&mut self, angle: f32, handle: AxisHandle) -> Result<(), SceneError> {
        let index = self.axis_index(handle)?;
        let axis = &mut self.axes[index];
        axis.angle = axis.clamp(angle);
        self.update();
        Ok(())
    }

    pub fn rotate(&mut self, angle: f32, handle: AxisHandle) -> Result<(), SceneError> {
        self.set_current_angle(angle, handle)
    }

    /// Sets both the default and the current angle. Not clamped.
    pub fn set_default_angle(&mut self, angle: f32, handle: AxisHandle) -> Result<(), SceneError> {
        let index = self.axis_index(handle)?;
        let axis = &mut self.axes[index];
        axis.default_angle = angle;
        axis.angle = angle;
        self.update();
        Ok(())
    }

    /// Changes the allowed angle range. `None` keeps the current bound.
    ///
    /// The current angle is not re-clamped until it is next set.
    pub fn set_rotate_extent(
        &mut self,
        handle: AxisHandle,
        min: Option<f32>,
        max: Option<f32>,
    ) -> Result<(), SceneError> {
        let index = self.axis_index(handle)?;
        let axis = &mut self.axes[index];
        let mut lo = min.unwrap_or(axis.range[0]);
        let mut hi = max.unwrap_or(axis.range[1]);
        if lo > hi {
            log::warn!(
                "Rotate extent on axis {:?} of {} given inverted ({}, {}), swapping",
                handle.axis,
                self.id,
                lo,
                hi
            );
            std::mem::swap(&mut lo, &mut hi);
        }
        axis.range = [lo, hi];
        Ok(())
    }

    /// Re-bases the three rotation axes without moving the rendered node.
    ///
    /// The rotation currently produced by the angles is folded into the
    /// pre-rotation, the angles are zeroed and the normalized new axes are
    /// stored.
    pub fn change_rotation_axis(&mut self, u: &Point, v: &Point, w: &Point) -> Result<(), SceneError> {
        let new_axes = [
            vector3(&u.normalize())?,
            vector3(&v.normalize())?,
            vector3(&w.normalize())?,
        ];

        let [qu, qv, qw] = self.axes.map(|a| a.quaternion());
        let folded = (qu * qv * qw).normalize().to_matrix();
        self.pre_rotation = folded * self.pre_rotation;

        for (axis, direction) in self.axes.iter_mut().zip(new_axes) {
            axis.direction = direction;
            axis.angle = 0.0;
        }
        self.update();
        Ok(())
    }

    // Position and scale

    pub fn current_position(&self) -> Vector3<f32> {
        self.current_pos
    }

    pub fn set_current_position(&mut self, position: &Point) -> Result<(), SceneError> {
        self.current_pos = vector3(position)?;
        self.update();
        Ok(())
    }

    /// Sets both the default and the current position.
    pub fn set_default_position(&mut self, position: &Point) -> Result<(), SceneError> {
        let position = vector3(position)?;
        self.default_pos = position;
        self.current_pos = position;
        self.update();
        Ok(())
    }

    pub fn current_scale(&self) -> [f32; 3] {
        self.current_scale
    }

    /// Sets the scale; all three components must be equal.
    pub fn set_current_scale(&mut self, scale: &[f32]) -> Result<(), SceneError> {
        self.current_scale = uniform_scale(scale)?;
        self.update();
        Ok(())
    }

    pub fn set_default_scale(&mut self, scale: &[f32]) -> Result<(), SceneError> {
        let scale = uniform_scale(scale)?;
        self.default_scale = scale;
        self.current_scale = scale;
        self.update();
        Ok(())
    }

    pub fn pre_rotation(&self) -> Matrix4<f32> {
        self.pre_rotation
    }

    pub fn set_pre_rotation(&mut self, rotation: Matrix4<f32>) {
        self.pre_rotation = rotation;
        self.update();
    }

    pub fn set_post_rotation(&mut self, rotation: Matrix4<f32>) {
        self.post_rotation = rotation;
        self.update();
    }

    // Appearance

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }

    pub fn routing(&self) -> RenderingRouting {
        self.routing
    }

    pub fn set_rendering_routing(&mut self, routing: RenderingRouting) {
        self.routing = routing;
    }

    /// Attaches a texture and turns texturing on.
    pub fn set_texture(&mut self, texture: Texture) {
        self.texture = Some(texture);
        self.texture_enabled = true;
    }

    pub fn set_texture_enabled(&mut self, enabled: bool) {
        self.texture_enabled = enabled;
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    // Transform propagation

    /// World transform from the last update.
    pub fn transform(&self) -> Matrix4<f32> {
        self.transform
    }

    /// World-space origin of this node.
    pub fn world_position(&self) -> Vector3<f32> {
        self.transform.w.truncate()
    }

    fn local_transform(&self) -> Matrix4<f32> {
        let p = self.current_pos;
        let [u, v, w] = self.axes.map(|a| transform::rotate(a.angle, a.direction));
        let s = self.current_scale[0];
        transform::translate(p.x, p.y, p.z)
            * self.post_rotation
            * u
            * v
            * w
            * self.pre_rotation
            * transform::scale(s, s, s)
    }

    /// Recomputes this subtree against the last parent transform received.
    pub fn update(&mut self) {
        self.update_with_parent(self.parent_transform);
    }

    pub fn update_with_parent(&mut self, parent: Matrix4<f32>) {
        self.parent_transform = parent;
        self.transform = parent * self.local_transform();
        let transform = self.transform;
        for child in &mut self.children {
            child.update_with_parent(transform);
        }
    }

    /// Restores the state selected by `mode` to its defaults.
    ///
    /// Rotation axes go back to x, y, z with an identity pre-rotation.
    pub fn reset(&mut self, mode: ResetMode) {
        if mode.covers(ResetMode::Angle) {
            for axis in &mut self.axes {
                axis.angle = axis.default_angle;
            }
        }
        if mode.covers(ResetMode::Position) {
            self.current_pos = self.default_pos;
        }
        if mode.covers(ResetMode::Scale) {
            self.current_scale = self.default_scale;
        }
        if mode.covers(ResetMode::RotationAxis) {
            self.pre_rotation = Matrix4::identity();
            for (axis, direction) in self.axes.iter_mut().zip(DEFAULT_AXES) {
                axis.direction = direction;
            }
        }
        self.update();
    }

    // Rendering

    /// Uploads every drawable in the subtree, then seeds all transforms.
    pub fn initialize(&mut self, facade: &mut dyn RenderFacade) {
        self.initialize_drawables(facade);
        self.update();
    }

    fn initialize_drawables(&mut self, facade: &mut dyn RenderFacade) {
        if let Some(drawable) = self.drawable.as_mut() {
            drawable.initialize(facade);
        }
        for child in &mut self.children {
            child.initialize_drawables(facade);
        }
    }

    /// Submits this node, then its children in insertion order.
    pub fn draw(&self, facade: &mut dyn RenderFacade) {
        if let Some(drawable) = &self.drawable {
            facade.set_model_matrix(self.transform);
            facade.set_material(&self.material);
            facade.set_routing(self.routing);
            match &self.texture {
                Some(texture) if self.texture_enabled => facade.bind_texture(texture),
                _ => facade.unbind_texture(),
            }
            drawable.draw(facade);
        }
        for child in &self.children {
            child.draw(facade);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_cube;
    use crate::gfx::rendering::RenderState;
    use crate::gfx::scene::Mesh;
    use crate::math::ColorType;
    use cgmath::{InnerSpace, Vector4};

    fn node(x: f32, y: f32, z: f32) -> Component {
        Component::new(&Point::xyz(x, y, z), None).unwrap()
    }

    fn cube_node(x: f32, y: f32, z: f32) -> Component {
        let mesh = Mesh::new(generate_cube(1.0, 1.0, 1.0, ColorType::RED));
        Component::new(&Point::xyz(x, y, z), Some(Box::new(mesh))).unwrap()
    }

    fn assert_matrix_eq(a: Matrix4<f32>, b: Matrix4<f32>) {
        for c in 0..4 {
            for r in 0..4 {
                assert!(
                    (a[c][r] - b[c][r]).abs() < 1e-4,
                    "mismatch at [{}][{}]: {:?} vs {:?}",
                    c,
                    r,
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn test_angle_is_clamped_to_range() {
        let mut c = node(0.0, 0.0, 0.0);
        let u = c.u_axis();
        c.set_rotate_extent(u, Some(-45.0), Some(30.0)).unwrap();
        for (input, expected) in [(100.0, 30.0), (-90.0, -45.0), (10.0, 10.0), (30.0, 30.0)] {
            c.set_current_angle(input, u).unwrap();
            assert_eq!(c.angle(u).unwrap(), expected);
        }
    }

    #[test]
    fn test_inverted_extent_is_swapped() {
        let mut c = node(0.0, 0.0, 0.0);
        let w = c.w_axis();
        c.set_rotate_extent(w, Some(50.0), Some(-20.0)).unwrap();
        assert_eq!(c.range(w).unwrap(), [-20.0, 50.0]);

        c.set_rotate_extent(w, None, Some(10.0)).unwrap();
        assert_eq!(c.range(w).unwrap(), [-20.0, 10.0]);
    }

    #[test]
    fn test_foreign_axis_handle_is_rejected() {
        let mut a = node(0.0, 0.0, 0.0);
        let b = node(0.0, 0.0, 0.0);
        let err = a.set_current_angle(10.0, b.u_axis()).unwrap_err();
        assert!(matches!(err, SceneError::UnknownAxis(id) if id == a.id()));
        assert_eq!(a.angle(a.u_axis()).unwrap(), 0.0);
    }

    #[test]
    fn test_child_resolves_against_translated_parent() {
        let mut root = node(0.0, 0.0, 0.0);
        let child = root.add_child(node(1.0, 0.0, 0.0));
        root.set_current_position(&Point::xyz(0.0, 5.0, 0.0)).unwrap();

        let world = root.find(child).unwrap().world_position();
        assert!((world - Vector3::new(1.0, 5.0, 0.0)).magnitude() < 1e-6);
    }

    #[test]
    fn test_child_transform_is_parent_times_local() {
        let mut root = node(0.5, -1.0, 2.0);
        root.set_current_angle(40.0, root.v_axis()).unwrap();
        let mut child = node(1.0, 2.0, 0.0);
        child.set_current_angle(-25.0, child.u_axis()).unwrap();
        child.set_current_scale(&[2.0, 2.0, 2.0]).unwrap();
        let local = child.transform();
        let id = root.add_child(child);

        assert_matrix_eq(root.find(id).unwrap().transform(), root.transform() * local);
    }

    #[test]
    fn test_grandparent_move_shifts_grandchild_by_delta() {
        let mut root = node(0.0, 0.0, 0.0);
        let mut parent = node(1.0, 0.0, 0.0);
        parent.set_current_angle(90.0, parent.w_axis()).unwrap();
        let grandchild = parent.add_child(node(2.0, 0.0, 0.0));
        root.add_child(parent);

        let before = root.find(grandchild).unwrap().world_position();
        root.set_current_position(&Point::xyz(3.0, -2.0, 0.5)).unwrap();
        let after = root.find(grandchild).unwrap().world_position();

        assert!((after - before - Vector3::new(3.0, -2.0, 0.5)).magnitude() < 1e-5);
    }

    #[test]
    fn test_rotation_order_applies_w_before_u() {
        let mut c = node(0.0, 0.0, 0.0);
        c.set_current_angle(90.0, c.u_axis()).unwrap();
        c.set_current_angle(90.0, c.w_axis()).unwrap();
        // w takes x to y, then u takes y to z.
        let p = c.transform() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!((p - Vector4::new(0.0, 0.0, 1.0, 1.0)).magnitude() < 1e-5);
    }

    #[test]
    fn test_rebasing_preserves_orientation() {
        let mut c = node(0.3, 0.0, -1.0);
        c.set_current_angle(35.0, c.u_axis()).unwrap();
        c.set_current_angle(-60.0, c.v_axis()).unwrap();
        c.set_current_angle(120.0, c.w_axis()).unwrap();
        c.set_current_scale(&[1.5, 1.5, 1.5]).unwrap();
        let before = c.transform();

        c.change_rotation_axis(
            &Point::xyz(0.0, 0.0, 2.0),
            &Point::xyz(1.0, 1.0, 0.0),
            &Point::xyz(1.0, -1.0, 0.0),
        )
        .unwrap();

        assert_matrix_eq(c.transform(), before);
        assert_eq!(c.angle(c.v_axis()).unwrap(), 0.0);
        assert!((c.u() - Vector3::unit_z()).magnitude() < 1e-6);
        assert!((c.v().magnitude() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rebasing_rejects_wrong_dimension() {
        let mut c = node(0.0, 0.0, 0.0);
        c.set_current_angle(20.0, c.u_axis()).unwrap();
        let before = c.transform();
        let err = c
            .change_rotation_axis(
                &Point::xyz(1.0, 0.0, 0.0),
                &Point::new(vec![0.0, 1.0]),
                &Point::xyz(0.0, 0.0, 1.0),
            )
            .unwrap_err();
        assert!(matches!(err, SceneError::DimensionMismatch { expected: 3, found: 2 }));
        assert_eq!(c.transform(), before);
        assert_eq!(c.angle(c.u_axis()).unwrap(), 20.0);
    }

    #[test]
    fn test_reset_all_restores_defaults() {
        let mut c = node(1.0, 2.0, 3.0);
        c.set_default_angle(15.0, c.v_axis()).unwrap();
        let initial = c.transform();

        c.set_current_position(&Point::xyz(-4.0, 0.0, 0.0)).unwrap();
        c.set_current_angle(80.0, c.u_axis()).unwrap();
        c.set_current_angle(-10.0, c.v_axis()).unwrap();
        c.set_current_scale(&[3.0, 3.0, 3.0]).unwrap();
        c.change_rotation_axis(
            &Point::xyz(0.0, 1.0, 0.0),
            &Point::xyz(0.0, 0.0, 1.0),
            &Point::xyz(1.0, 0.0, 0.0),
        )
        .unwrap();

        c.reset(ResetMode::All);

        assert_eq!(c.current_position(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(c.angle(c.u_axis()).unwrap(), 0.0);
        assert_eq!(c.angle(c.v_axis()).unwrap(), 15.0);
        assert_eq!(c.current_scale(), [1.0; 3]);
        assert_eq!(c.u(), Vector3::unit_x());
        assert_eq!(c.w(), Vector3::unit_z());
        assert_eq!(c.pre_rotation(), Matrix4::identity());
        assert_matrix_eq(c.transform(), initial);
    }

    #[test]
    fn test_reset_single_mode() {
        let mut c = node(0.0, 0.0, 0.0);
        c.set_current_position(&Point::xyz(1.0, 1.0, 1.0)).unwrap();
        c.set_current_angle(30.0, c.u_axis()).unwrap();
        c.reset("position".parse().unwrap());
        assert_eq!(c.current_position(), Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(c.angle(c.u_axis()).unwrap(), 30.0);
        assert!("everything".parse::<ResetMode>().is_err());
    }

    #[test]
    fn test_non_uniform_scale_is_rejected() {
        let mut c = node(0.0, 0.0, 0.0);
        c.set_current_scale(&[2.0, 2.0, 2.0]).unwrap();
        let before = c.transform();

        let err = c.set_current_scale(&[1.0, 2.0, 1.0]).unwrap_err();
        assert!(matches!(err, SceneError::NonUniformScale(_)));
        assert!(matches!(
            c.set_current_scale(&[1.0, 1.0]),
            Err(SceneError::DimensionMismatch { expected: 3, found: 2 })
        ));
        assert_eq!(c.current_scale(), [2.0; 3]);
        assert_eq!(c.transform(), before);
    }

    #[test]
    fn test_position_must_be_three_dimensional() {
        assert!(Component::new(&Point::new(vec![1.0, 2.0]), None).is_err());
        let mut c = node(0.0, 0.0, 0.0);
        assert!(c.set_current_position(&Point::new(vec![1.0])).is_err());
        assert_eq!(c.current_position(), Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_add_child_is_idempotent_by_identity() {
        let mut root = node(0.0, 0.0, 0.0);
        let first = root.add_child(node(1.0, 0.0, 0.0));
        root.add_child(node(1.0, 0.0, 0.0));
        assert_eq!(root.children().len(), 2);
        assert_ne!(root.children()[1].id(), first);
    }

    #[test]
    fn test_clear_drops_descendants() {
        let mut root = node(0.0, 0.0, 0.0);
        let mut child = node(1.0, 0.0, 0.0);
        let grandchild = child.add_child(node(0.0, 1.0, 0.0));
        root.add_child(child);
        root.clear();
        assert!(root.children().is_empty());
        assert!(root.find(grandchild).is_none());
    }

    #[test]
    fn test_draw_visits_parent_then_children_in_order() {
        let mut state = RenderState::new();
        let mut root = cube_node(0.0, 0.0, 0.0);
        root.add_child(cube_node(1.0, 0.0, 0.0));
        // Grouping node without a drawable pushes nothing itself.
        let mut group = node(2.0, 0.0, 0.0);
        group.add_child(cube_node(0.0, 1.0, 0.0));
        root.add_child(group);
        root.add_child(cube_node(3.0, 0.0, 0.0));
        root.initialize(&mut state);

        root.draw(&mut state);
        let xs: Vec<(f32, f32)> = state
            .commands()
            .iter()
            .map(|c| (c.model.w.x, c.model.w.y))
            .collect();
        assert_eq!(xs, vec![(0.0, 0.0), (1.0, 0.0), (2.0, 1.0), (3.0, 0.0)]);
    }

    #[test]
    fn test_draw_pushes_material_routing_and_texture_state() {
        use crate::gfx::resources::{TextureImage, TextureUnitAllocator};

        let mut state = RenderState::new();
        let mut allocator = TextureUnitAllocator::new();
        let mut root = cube_node(0.0, 0.0, 0.0);
        let material = Material::new([0.2; 4], [0.5; 4], [1.0; 4], 16.0);
        root.set_material(material);
        root.set_rendering_routing(RenderingRouting::LIGHTING | RenderingRouting::TEXTURE);
        root.set_texture(Texture::new(TextureImage::solid(ColorType::WHITE), &mut allocator));
        root.initialize(&mut state);

        root.draw(&mut state);
        root.set_texture_enabled(false);
        root.draw(&mut state);

        let commands = state.commands();
        assert_eq!(commands[0].material, material);
        assert_eq!(
            commands[0].routing,
            RenderingRouting::LIGHTING | RenderingRouting::TEXTURE
        );
        assert!(commands[0].texture.is_some());
        assert!(commands[1].texture.is_none());
    }
}
