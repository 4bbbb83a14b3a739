//! Built-in functions and point initializers.
//!
//! Every name registered in [`crate::system::FUNCTIONS`] is dispatched
//! here. Drawing built-ins sample their shape at the canvas resolution and
//! return nothing; the numeric built-ins return a number.

use std::fmt::Write as _;

use hydra_geometry::canvas::Path;
use hydra_geometry::frame::Frame;
use hydra_geometry::math::{theta, uniform_in};
use hydra_geometry::polar::Pol;
use hydra_geometry::shapes::{arc_path, circle_path, line_path, sample_parameters};
use hydra_geometry::types::lerp;

use crate::ast::Node;
use crate::error::{ErrorKind, HydraError, InterpResult};
use crate::types::Value;

use super::Interpreter;
use super::helpers::argument_node;

/// Hidden variable holding the current sample of a curve built-in.
const CURSOR: &str = "_p";

fn invalid(call: &str, reason: &str) -> HydraError {
    HydraError::new(
        ErrorKind::InvalidArgument,
        format!("Could not interpret '{call}'. {reason}"),
    )
}

fn positive_radius(call: &str, radius: f64) -> InterpResult<f64> {
    if radius > 0.0 && radius.is_finite() {
        Ok(radius)
    } else {
        Err(invalid(call, "The radius must be positive."))
    }
}

impl Interpreter {
    /// Dispatch a `Function` node to its built-in.
    pub(super) fn call_function(&mut self, call: &Node) -> InterpResult<Value> {
        match call.value.as_str() {
            "arc" => self.builtin_arc(call),
            "circle" => self.builtin_circle(call),
            "line" => self.builtin_line(call),
            "curve_angle" => self.builtin_curve_angle(call),
            "curve_distance" => self.builtin_curve_distance(call),
            "mark" => self.builtin_mark(call),
            "clear" => {
                self.canvas.clear();
                Ok(Value::Vacuous)
            }
            "save" => self.builtin_save(call),
            "resolution" => self.builtin_resolution(call),
            "sin" | "cos" | "sinh" | "cosh" | "exp" | "log" | "sqrt" => self.builtin_math(call),
            "random" => self.builtin_random(call),
            "distance" => self.builtin_distance(call),
            "theta" => self.builtin_theta(call),
            "radial" | "angular" => self.builtin_coordinate(call),
            "print" => self.builtin_print(call),
            "show" => Ok(self.builtin_show()),
            name => Err(HydraError::new(
                ErrorKind::UnknownFunction,
                format!("Could not interpret '{name}'. No function definition found."),
            )),
        }
    }

    /// Evaluate an `Initialization` node to a point.
    pub(super) fn eval_initialization(&mut self, node: &Node) -> InterpResult<Value> {
        let args = self.interpret_arguments(node, None)?;
        let point = match node.value.as_str() {
            "Pol" => Pol::new(args.number("r")?, args.number("phi")?),
            "Euc" => Pol::from_euclidean(args.number("x")?, args.number("y")?),
            name => {
                return Err(HydraError::new(
                    ErrorKind::UnknownFunction,
                    format!("Could not interpret '{name}'. No initialization definition found."),
                ));
            }
        };
        if !(point.r.is_finite() && point.phi.is_finite()) {
            return Err(invalid(&node.value, "The coordinates must be finite."));
        }
        Ok(Value::Point(point))
    }

    // =======================================================================
    // Drawing
    // =======================================================================

    fn builtin_circle(&mut self, call: &Node) -> InterpResult<Value> {
        let args = self.interpret_arguments(call, None)?;
        let center = args.point("center")?;
        let radius = positive_radius(&call.value, args.number("radius")?)?;
        let path = circle_path(center, radius, self.canvas.resolution());
        self.canvas.add_path(path);
        Ok(Value::Vacuous)
    }

    fn builtin_arc(&mut self, call: &Node) -> InterpResult<Value> {
        let args = self.interpret_arguments(call, None)?;
        let center = args.point("center")?;
        let radius = positive_radius(&call.value, args.number("radius")?)?;
        let from = args.number("from")?;
        let to = args.number("to")?;
        let path = arc_path(center, radius, from, to, self.canvas.resolution());
        self.canvas.add_path(path);
        Ok(Value::Vacuous)
    }

    fn builtin_line(&mut self, call: &Node) -> InterpResult<Value> {
        let args = self.interpret_arguments(call, None)?;
        let path = line_path(
            args.point("from")?,
            args.point("to")?,
            self.canvas.resolution(),
        );
        self.canvas.add_path(path);
        Ok(Value::Vacuous)
    }

    fn builtin_mark(&mut self, call: &Node) -> InterpResult<Value> {
        let args = self.interpret_arguments(call, None)?;
        let center = args.point("center")?;
        let radius = positive_radius(&call.value, args.number("radius")?)?;
        self.canvas.add_mark(center, radius, true);
        Ok(Value::Vacuous)
    }

    /// A curve whose angular coordinate is given as a function of the
    /// radius. `angle` is evaluated once per sample with `_p` set to the
    /// point at the sample's radius and the previous sample's angle.
    fn builtin_curve_angle(&mut self, call: &Node) -> InterpResult<Value> {
        let args = self.interpret_arguments(call, Some(&["from", "to"]))?;
        let mut from = args.point("from")?;
        let mut to = args.point("to")?;
        if from.r > to.r {
            std::mem::swap(&mut from, &mut to);
        }
        let angle = argument_node(call, "angle")?;

        self.state.open_scope();
        let sampled = self.sample_curve_angle(&call.value, from, to, angle);
        self.state.close_scope();

        self.canvas.add_path(Path::from_points(sampled?, false));
        Ok(Value::Vacuous)
    }

    fn sample_curve_angle(
        &mut self,
        call: &str,
        from: Pol,
        to: Pol,
        angle: &Node,
    ) -> InterpResult<Vec<Pol>> {
        let resolution = self.canvas.resolution();
        let scope = self.state.define(CURSOR, Value::Point(from))?;
        let mut phi = from.phi;
        let mut points = Vec::with_capacity(resolution + 1);
        for t in sample_parameters(resolution) {
            let r = lerp(from.r, to.r, t);
            self.state.set(CURSOR, Value::Point(Pol::new(r, phi)), scope)?;
            phi = self.evaluate_number(call, "angle", angle)?;
            points.push(Pol::new(r, phi));
        }
        Ok(points)
    }

    /// A curve at a varying signed distance from the segment `from`–`to`.
    /// `distance` is evaluated once per sample with `_p` set to the
    /// corresponding point on the segment.
    fn builtin_curve_distance(&mut self, call: &Node) -> InterpResult<Value> {
        let args = self.interpret_arguments(call, Some(&["from", "to"]))?;
        let from = args.point("from")?;
        let to = args.point("to")?;
        let distance = argument_node(call, "distance")?;

        self.state.open_scope();
        let sampled = self.sample_curve_distance(&call.value, from, to, distance);
        self.state.close_scope();

        self.canvas.add_path(Path::from_points(sampled?, false));
        Ok(Value::Vacuous)
    }

    fn sample_curve_distance(
        &mut self,
        call: &str,
        from: Pol,
        to: Pol,
        distance: &Node,
    ) -> InterpResult<Vec<Pol>> {
        let resolution = self.canvas.resolution();
        let (frame, length) = Frame::along(from, to);
        let scope = self.state.define(CURSOR, Value::Point(from))?;
        let mut points = Vec::with_capacity(resolution + 1);
        for t in sample_parameters(resolution) {
            let along = length * t;
            let on_segment = frame.offset_point(along, 0.0);
            self.state.set(CURSOR, Value::Point(on_segment), scope)?;
            let offset = self.evaluate_number(call, "distance", distance)?;
            points.push(frame.offset_point(along, offset));
        }
        Ok(points)
    }

    // =======================================================================
    // Canvas settings and output
    // =======================================================================

    fn builtin_save(&mut self, call: &Node) -> InterpResult<Value> {
        let args = self.interpret_arguments(call, None)?;
        let file = args.string("file")?;
        self.save(file)?;
        Ok(Value::Vacuous)
    }

    fn builtin_resolution(&mut self, call: &Node) -> InterpResult<Value> {
        let args = self.interpret_arguments(call, None)?;
        let samples = args.number("samples")?;
        self.canvas
            .set_resolution(samples)
            .map_err(|err| invalid(&call.value, &err.to_string()))?;
        Ok(Value::Vacuous)
    }

    fn builtin_print(&mut self, call: &Node) -> InterpResult<Value> {
        let args = self.interpret_arguments(call, None)?;
        let message = args.value("message")?.display_string().ok_or_else(|| {
            invalid(&call.value, "The message did not have a value.")
        })?;
        self.output.push_str(&message);
        self.output.push('\n');
        Ok(Value::Vacuous)
    }

    /// List every visible variable, innermost scope first.
    fn builtin_show(&mut self) -> Value {
        let mut listing = String::new();
        let scopes: Vec<_> = self.state.scopes().collect();
        for (index, scope) in scopes.into_iter().enumerate().rev() {
            let _ = writeln!(listing, "Scope {index}: ({} variables)", scope.len());
            let mut names: Vec<&String> = scope.keys().collect();
            names.sort();
            for (i, name) in names.into_iter().enumerate() {
                let shown = scope[name].display_string().unwrap_or_default();
                let _ = writeln!(listing, "  [{i}] {name} = '{shown}'");
            }
        }
        self.output.push_str(&listing);
        Value::Vacuous
    }

    // =======================================================================
    // Numbers
    // =======================================================================

    fn builtin_math(&mut self, call: &Node) -> InterpResult<Value> {
        let args = self.interpret_arguments(call, None)?;
        let x = args.number("x")?;
        let name = call.value.as_str();
        let result = match name {
            "sin" => x.sin(),
            "cos" => x.cos(),
            "sinh" => x.sinh(),
            "cosh" => x.cosh(),
            "exp" => x.exp(),
            "log" if x <= 0.0 => return Err(invalid(name, "The argument must be positive.")),
            "log" => x.ln(),
            "sqrt" if x < 0.0 => return Err(invalid(name, "The argument must not be negative.")),
            _ => x.sqrt(),
        };
        if !result.is_finite() {
            return Err(HydraError::new(
                ErrorKind::ArithmeticError,
                format!("Could not interpret '{name}'. The result is not a finite number."),
            ));
        }
        Ok(Value::Number(result))
    }

    fn builtin_random(&mut self, call: &Node) -> InterpResult<Value> {
        let args = self.interpret_arguments(call, None)?;
        let from = args.number("from")?;
        let to = args.number("to")?;
        if to < from {
            return Err(invalid(
                &call.value,
                "Argument 'from' must not be larger than 'to'.",
            ));
        }
        Ok(Value::Number(uniform_in(from, to, &mut self.random_seed)))
    }

    fn builtin_distance(&mut self, call: &Node) -> InterpResult<Value> {
        let args = self.interpret_arguments(call, None)?;
        let from = args.point("from")?;
        let to = args.point("to")?;
        Ok(Value::Number(from.distance_to(to)))
    }

    fn builtin_theta(&mut self, call: &Node) -> InterpResult<Value> {
        let args = self.interpret_arguments(call, None)?;
        let r1 = args.number("r1")?;
        let r2 = args.number("r2")?;
        let big_r = args.number("R")?;
        if r1 < 0.0 || r2 < 0.0 || big_r < 0.0 {
            return Err(invalid(&call.value, "Lengths must not be negative."));
        }
        if r1 + r2 < big_r || (r1 - r2).abs() > big_r {
            return Err(invalid(
                &call.value,
                &format!("No triangle has sides {r1}, {r2} and {big_r}."),
            ));
        }
        theta(r1, r2, big_r).map(Value::Number).ok_or_else(|| {
            HydraError::new(
                ErrorKind::ArithmeticError,
                format!(
                    "Could not interpret '{}'. The angle is undefined for these lengths.",
                    call.value
                ),
            )
        })
    }

    fn builtin_coordinate(&mut self, call: &Node) -> InterpResult<Value> {
        let args = self.interpret_arguments(call, None)?;
        let point = args.point("of")?;
        let coordinate = if call.value == "radial" {
            point.r
        } else {
            point.phi
        };
        Ok(Value::Number(coordinate))
    }
}
