//! In-memory stand-in for the driver, used by unit tests.
//!
//! Keeps just enough state to behave like a strict OpenGL implementation:
//! sticky error flags, buffer sizes, release counts, a toy compiler and a log
//! of draw calls.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use crate::opengl::GlDriver;

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub mode: u32,
    pub count: i32,
    pub element_type: u32,
    pub offset: i32,
    pub program: Option<u32>,
    pub vertex_array: Option<u32>,
    pub index_buffer: Option<u32>,
    pub index_buffer_size: Option<usize>,
    pub color: Option<[f32; 4]>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttribPointer {
    pub index: u32,
    pub size: i32,
    pub data_type: u32,
    pub normalized: bool,
    pub stride: i32,
    pub offset: i32,
    pub buffer: u32,
}

#[derive(Debug)]
struct StubShader {
    shader_type: u32,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Debug, Default)]
struct StubProgram {
    attached: Vec<u32>,
    linked: bool,
    validated: bool,
    log: String,
    uniforms: Vec<String>,
    values: HashMap<u32, [f32; 4]>,
}

#[derive(Debug, Default)]
struct State {
    next_id: u32,
    errors: VecDeque<u32>,

    buffers: HashMap<u32, Option<usize>>,
    bound_buffers: HashMap<u32, u32>,
    deleted_buffers: Vec<u32>,

    vertex_arrays: HashMap<u32, Option<u32>>,
    bound_vertex_array: Option<u32>,
    deleted_vertex_arrays: Vec<u32>,
    enabled_attribs: Vec<u32>,
    attrib_pointers: Vec<AttribPointer>,

    shaders: HashMap<u32, StubShader>,
    deleted_shaders: Vec<u32>,
    programs: HashMap<u32, StubProgram>,
    deleted_programs: Vec<u32>,
    current_program: Option<u32>,
    program_binds: usize,

    clears: Vec<u32>,
    viewport: Option<(i32, i32, i32, i32)>,
    draws: Vec<DrawCall>,
}

impl State {
    fn next_handle(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn error(&mut self, code: u32) {
        self.errors.push_back(code);
    }
}

#[derive(Debug, Default)]
pub struct StubDriver {
    state: RefCell<State>,
    fail_allocations: Cell<bool>,
    fail_uploads: Cell<bool>,
    fail_validation: Cell<bool>,
    failing_call: Cell<Option<&'static str>>,
}

impl StubDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises a flag as if the previous call had failed.
    pub fn push_error(&self, code: u32) {
        self.state.borrow_mut().error(code);
    }

    /// Makes every `create_*` call fail.
    pub fn fail_allocations(&self, fail: bool) {
        self.fail_allocations.set(fail);
    }

    /// Makes every buffer upload raise `OUT_OF_MEMORY`.
    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.set(fail);
    }

    /// Makes every program fail validation, even when it linked.
    pub fn fail_validation(&self, fail: bool) {
        self.fail_validation.set(fail);
    }

    /// Makes the named driver method raise `INVALID_OPERATION` every time it
    /// runs. The method still does its work.
    pub fn fail_call(&self, name: &'static str) {
        self.failing_call.set(Some(name));
    }

    fn raise_if_failing(&self, name: &'static str) {
        if self.failing_call.get() == Some(name) {
            self.state.borrow_mut().error(glow::INVALID_OPERATION);
        }
    }

    pub fn buffer_size(&self, buffer: u32) -> Option<usize> {
        self.state.borrow().buffers.get(&buffer).copied().flatten()
    }

    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    pub fn buffer_releases(&self, buffer: u32) -> usize {
        let state = self.state.borrow();
        state.deleted_buffers.iter().filter(|&&b| b == buffer).count()
    }

    pub fn bound_buffer(&self, target: u32) -> Option<u32> {
        self.state.borrow().bound_buffers.get(&target).copied()
    }

    pub fn vertex_array_releases(&self, vertex_array: u32) -> usize {
        let state = self.state.borrow();
        state
            .deleted_vertex_arrays
            .iter()
            .filter(|&&v| v == vertex_array)
            .count()
    }

    pub fn bound_vertex_array(&self) -> Option<u32> {
        self.state.borrow().bound_vertex_array
    }

    pub fn enabled_attribs(&self) -> Vec<u32> {
        self.state.borrow().enabled_attribs.clone()
    }

    pub fn attrib_pointers(&self) -> Vec<AttribPointer> {
        self.state.borrow().attrib_pointers.clone()
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn shader_releases(&self) -> usize {
        self.state.borrow().deleted_shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn program_releases(&self, program: u32) -> usize {
        let state = self.state.borrow();
        state.deleted_programs.iter().filter(|&&p| p == program).count()
    }

    pub fn current_program(&self) -> Option<u32> {
        self.state.borrow().current_program
    }

    /// Number of `use_program` calls that bound a program.
    pub fn program_binds(&self) -> usize {
        self.state.borrow().program_binds
    }

    pub fn uniform_value(&self, program: u32, location: u32) -> Option<[f32; 4]> {
        let state = self.state.borrow();
        state.programs.get(&program)?.values.get(&location).copied()
    }

    pub fn clears(&self) -> Vec<u32> {
        self.state.borrow().clears.clone()
    }

    pub fn viewport_size(&self) -> Option<(i32, i32, i32, i32)> {
        self.state.borrow().viewport
    }

    pub fn draws(&self) -> Vec<DrawCall> {
        self.state.borrow().draws.clone()
    }

    pub fn pending_errors(&self) -> usize {
        self.state.borrow().errors.len()
    }
}

fn is_buffer_target(target: u32) -> bool {
    matches!(target, glow::ARRAY_BUFFER | glow::ELEMENT_ARRAY_BUFFER)
}

// Collects `uniform <type> <name>;` declarations.
fn declared_uniforms(source: &str) -> Vec<String> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("uniform "))
        .filter_map(|line| line.trim_end_matches(';').split_whitespace().last())
        .map(str::to_string)
        .collect()
}

impl GlDriver for StubDriver {
    type Buffer = u32;
    type VertexArray = u32;
    type Shader = u32;
    type Program = u32;
    type UniformLocation = u32;

    fn get_error(&self) -> u32 {
        self.state
            .borrow_mut()
            .errors
            .pop_front()
            .unwrap_or(glow::NO_ERROR)
    }

    fn version_string(&self) -> String {
        "3.3.0 stub".to_string()
    }

    fn create_buffer(&self) -> Result<u32, String> {
        if self.fail_allocations.get() {
            return Err("stub: out of buffer names".to_string());
        }
        let mut state = self.state.borrow_mut();
        let buffer = state.next_handle();
        state.buffers.insert(buffer, None);
        Ok(buffer)
    }

    fn bind_buffer(&self, target: u32, buffer: Option<u32>) {
        let mut state = self.state.borrow_mut();
        if !is_buffer_target(target) {
            return state.error(glow::INVALID_ENUM);
        }
        match buffer {
            Some(b) if !state.buffers.contains_key(&b) => state.error(glow::INVALID_OPERATION),
            Some(b) => {
                state.bound_buffers.insert(target, b);
                if target == glow::ELEMENT_ARRAY_BUFFER {
                    if let Some(vao) = state.bound_vertex_array {
                        state.vertex_arrays.insert(vao, Some(b));
                    }
                }
            }
            None => {
                state.bound_buffers.remove(&target);
                if target == glow::ELEMENT_ARRAY_BUFFER {
                    if let Some(vao) = state.bound_vertex_array {
                        state.vertex_arrays.insert(vao, None);
                    }
                }
            }
        }
    }

    fn buffer_data_u8_slice(&self, target: u32, data: &[u8], usage: u32) {
        let mut state = self.state.borrow_mut();
        if !is_buffer_target(target) || (usage != glow::STATIC_DRAW && usage != glow::DYNAMIC_DRAW) {
            return state.error(glow::INVALID_ENUM);
        }
        let Some(&buffer) = state.bound_buffers.get(&target) else {
            return state.error(glow::INVALID_OPERATION);
        };
        if self.fail_uploads.get() {
            return state.error(glow::OUT_OF_MEMORY);
        }
        state.buffers.insert(buffer, Some(data.len()));
    }

    fn delete_buffer(&self, buffer: u32) {
        let mut state = self.state.borrow_mut();
        if state.buffers.remove(&buffer).is_some() {
            state.bound_buffers.retain(|_, bound| *bound != buffer);
        }
        state.deleted_buffers.push(buffer);
    }

    fn create_vertex_array(&self) -> Result<u32, String> {
        if self.fail_allocations.get() {
            return Err("stub: out of vertex array names".to_string());
        }
        let mut state = self.state.borrow_mut();
        let vertex_array = state.next_handle();
        state.vertex_arrays.insert(vertex_array, None);
        Ok(vertex_array)
    }

    fn bind_vertex_array(&self, vertex_array: Option<u32>) {
        let mut state = self.state.borrow_mut();
        match vertex_array {
            Some(v) => match state.vertex_arrays.get(&v).copied() {
                Some(element_buffer) => {
                    state.bound_vertex_array = Some(v);
                    match element_buffer {
                        Some(b) => state.bound_buffers.insert(glow::ELEMENT_ARRAY_BUFFER, b),
                        None => state.bound_buffers.remove(&glow::ELEMENT_ARRAY_BUFFER),
                    };
                }
                None => state.error(glow::INVALID_OPERATION),
            },
            None => {
                state.bound_vertex_array = None;
                state.bound_buffers.remove(&glow::ELEMENT_ARRAY_BUFFER);
            }
        }
    }

    fn delete_vertex_array(&self, vertex_array: u32) {
        let mut state = self.state.borrow_mut();
        state.vertex_arrays.remove(&vertex_array);
        if state.bound_vertex_array == Some(vertex_array) {
            state.bound_vertex_array = None;
        }
        state.deleted_vertex_arrays.push(vertex_array);
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        let mut state = self.state.borrow_mut();
        if state.bound_vertex_array.is_none() {
            return state.error(glow::INVALID_OPERATION);
        }
        state.enabled_attribs.push(index);
    }

    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        let mut state = self.state.borrow_mut();
        if !(1..=4).contains(&size) || stride < 0 {
            return state.error(glow::INVALID_VALUE);
        }
        let Some(&buffer) = state.bound_buffers.get(&glow::ARRAY_BUFFER) else {
            return state.error(glow::INVALID_OPERATION);
        };
        if state.bound_vertex_array.is_none() {
            return state.error(glow::INVALID_OPERATION);
        }
        state.attrib_pointers.push(AttribPointer {
            index,
            size,
            data_type,
            normalized,
            stride,
            offset,
            buffer,
        });
    }

    fn create_shader(&self, shader_type: u32) -> Result<u32, String> {
        if self.fail_allocations.get() {
            return Err("stub: cannot create shader".to_string());
        }
        let mut state = self.state.borrow_mut();
        if shader_type != glow::VERTEX_SHADER && shader_type != glow::FRAGMENT_SHADER {
            state.error(glow::INVALID_ENUM);
            return Err("stub: unsupported shader type".to_string());
        }
        let shader = state.next_handle();
        state.shaders.insert(
            shader,
            StubShader {
                shader_type,
                source: String::new(),
                compiled: false,
                log: String::new(),
            },
        );
        Ok(shader)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        let mut state = self.state.borrow_mut();
        match state.shaders.get_mut(&shader) {
            Some(s) => s.source = source.to_string(),
            None => state.error(glow::INVALID_VALUE),
        }
    }

    fn compile_shader(&self, shader: u32) {
        self.raise_if_failing("compile_shader");
        let mut state = self.state.borrow_mut();
        let Some(s) = state.shaders.get_mut(&shader) else {
            return state.error(glow::INVALID_VALUE);
        };
        if s.source.contains("void main") {
            s.compiled = true;
            s.log.clear();
        } else {
            s.compiled = false;
            s.log = "0:1(1): error: function `main' not defined".to_string();
        }
    }

    fn get_shader_compile_status(&self, shader: u32) -> bool {
        let state = self.state.borrow();
        state.shaders.get(&shader).is_some_and(|s| s.compiled)
    }

    fn get_shader_info_log(&self, shader: u32) -> String {
        let state = self.state.borrow();
        state
            .shaders
            .get(&shader)
            .map(|s| s.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: u32) {
        self.raise_if_failing("delete_shader");
        let mut state = self.state.borrow_mut();
        state.shaders.remove(&shader);
        state.deleted_shaders.push(shader);
    }

    fn create_program(&self) -> Result<u32, String> {
        if self.fail_allocations.get() {
            return Err("stub: cannot create program".to_string());
        }
        let mut state = self.state.borrow_mut();
        let program = state.next_handle();
        state.programs.insert(program, StubProgram::default());
        Ok(program)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.raise_if_failing("attach_shader");
        let mut state = self.state.borrow_mut();
        if !state.shaders.contains_key(&shader) {
            return state.error(glow::INVALID_VALUE);
        }
        match state.programs.get_mut(&program) {
            Some(p) => p.attached.push(shader),
            None => state.error(glow::INVALID_VALUE),
        }
    }

    fn link_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        let Some(attached) = state.programs.get(&program).map(|p| p.attached.clone()) else {
            return state.error(glow::INVALID_VALUE);
        };

        let compiled: Vec<&StubShader> = attached
            .iter()
            .filter_map(|s| state.shaders.get(s))
            .filter(|s| s.compiled)
            .collect();
        let has_stage = |shader_type| compiled.iter().any(|s| s.shader_type == shader_type);
        let linked = has_stage(glow::VERTEX_SHADER) && has_stage(glow::FRAGMENT_SHADER);
        let uniforms: Vec<String> = compiled
            .iter()
            .flat_map(|s| declared_uniforms(&s.source))
            .collect();

        if let Some(p) = state.programs.get_mut(&program) {
            p.linked = linked;
            p.uniforms = if linked { uniforms } else { Vec::new() };
            p.log = if linked {
                String::new()
            } else {
                "error: program needs a compiled vertex and fragment shader".to_string()
            };
        }
    }

    fn get_program_link_status(&self, program: u32) -> bool {
        let state = self.state.borrow();
        state.programs.get(&program).is_some_and(|p| p.linked)
    }

    fn get_program_info_log(&self, program: u32) -> String {
        let state = self.state.borrow();
        state
            .programs
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn validate_program(&self, program: u32) {
        let failing = self.fail_validation.get();
        let mut state = self.state.borrow_mut();
        let Some(p) = state.programs.get_mut(&program) else {
            return state.error(glow::INVALID_VALUE);
        };
        p.validated = p.linked && !failing;
        if !p.validated {
            p.log = "validation failed: program cannot run in the current state".to_string();
        }
    }

    fn get_program_validate_status(&self, program: u32) -> bool {
        let state = self.state.borrow();
        state.programs.get(&program).is_some_and(|p| p.validated)
    }

    fn use_program(&self, program: Option<u32>) {
        let mut state = self.state.borrow_mut();
        match program {
            Some(p) if !state.programs.get(&p).is_some_and(|p| p.linked) => {
                state.error(glow::INVALID_OPERATION)
            }
            Some(_) => {
                state.current_program = program;
                state.program_binds += 1;
            }
            None => state.current_program = None,
        }
    }

    fn delete_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        state.programs.remove(&program);
        if state.current_program == Some(program) {
            state.current_program = None;
        }
        state.deleted_programs.push(program);
    }

    fn get_uniform_location(&self, program: u32, name: &str) -> Option<u32> {
        let mut state = self.state.borrow_mut();
        let found = state
            .programs
            .get(&program)
            .filter(|p| p.linked)
            .map(|p| p.uniforms.iter().position(|u| u == name));

        match found {
            Some(position) => position.map(|i| i as u32),
            None => {
                state.error(glow::INVALID_OPERATION);
                None
            }
        }
    }

    fn uniform_4_f32(&self, location: Option<&u32>, x: f32, y: f32, z: f32, w: f32) {
        let mut state = self.state.borrow_mut();
        let Some(current) = state.current_program else {
            return state.error(glow::INVALID_OPERATION);
        };
        // A missing location is silently ignored, as in GL.
        let Some(&location) = location else {
            return;
        };
        let in_range = state
            .programs
            .get(&current)
            .is_some_and(|p| (location as usize) < p.uniforms.len());
        if !in_range {
            return state.error(glow::INVALID_OPERATION);
        }
        if let Some(program) = state.programs.get_mut(&current) {
            program.values.insert(location, [x, y, z, w]);
        }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        let mut state = self.state.borrow_mut();
        if width < 0 || height < 0 {
            return state.error(glow::INVALID_VALUE);
        }
        state.viewport = Some((x, y, width, height));
    }

    fn clear_color(&self, _red: f32, _green: f32, _blue: f32, _alpha: f32) {}

    fn clear(&self, mask: u32) {
        let mut state = self.state.borrow_mut();
        let known = glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT | glow::STENCIL_BUFFER_BIT;
        if mask & !known != 0 {
            return state.error(glow::INVALID_VALUE);
        }
        state.clears.push(mask);
    }

    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32) {
        let mut state = self.state.borrow_mut();
        if count < 0 {
            return state.error(glow::INVALID_VALUE);
        }
        let index_buffer = state.bound_buffers.get(&glow::ELEMENT_ARRAY_BUFFER).copied();
        if index_buffer.is_none() || state.current_program.is_none() {
            return state.error(glow::INVALID_OPERATION);
        }

        let program = state.current_program;
        let color = program
            .and_then(|p| state.programs.get(&p))
            .and_then(|p| p.values.get(&0).copied());
        let index_buffer_size = index_buffer.and_then(|b| state.buffers.get(&b).copied().flatten());
        let draw = DrawCall {
            mode,
            count,
            element_type,
            offset,
            program,
            vertex_array: state.bound_vertex_array,
            index_buffer,
            index_buffer_size,
            color,
        };
        state.draws.push(draw);
    }
}
