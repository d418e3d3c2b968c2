//! On-screen drawing surface.
//!
//! The canvas is a view of the strokes held by the capture workflow: pointer
//! events are forwarded as [`Point`]s and the canvas is repainted from the
//! workflow's strokes after every render. The PNG that gets saved is
//! rasterized from the same strokes, not read back from the canvas.

use std::f64::consts::PI;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use yew::prelude::*;

use common::signature::{Point, CANVAS_HEIGHT, CANVAS_WIDTH, STROKE_WIDTH};

const INK: &str = "#111827";

#[derive(Properties, PartialEq)]
pub struct SignatureCanvasProps {
    pub strokes: Vec<Vec<Point>>,
    pub on_start: Callback<Point>,
    pub on_move: Callback<Point>,
    #[prop_or_default]
    pub disabled: bool,
}

#[function_component(SignatureCanvas)]
pub fn signature_canvas(props: &SignatureCanvasProps) -> Html {
    let canvas_ref = use_node_ref();
    let pressed = use_mut_ref(|| false);

    {
        let canvas_ref = canvas_ref.clone();
        use_effect_with(props.strokes.clone(), move |strokes| {
            paint(&canvas_ref, strokes);
        });
    }

    let onpointerdown = {
        let pressed = pressed.clone();
        let on_start = props.on_start.clone();
        let disabled = props.disabled;
        Callback::from(move |e: PointerEvent| {
            if disabled {
                return;
            }
            e.prevent_default();
            *pressed.borrow_mut() = true;
            on_start.emit(point_of(&e));
        })
    };
    let onpointermove = {
        let pressed = pressed.clone();
        let on_move = props.on_move.clone();
        Callback::from(move |e: PointerEvent| {
            if *pressed.borrow() {
                e.prevent_default();
                on_move.emit(point_of(&e));
            }
        })
    };
    let release = {
        let pressed = pressed.clone();
        Callback::from(move |_: PointerEvent| {
            *pressed.borrow_mut() = false;
        })
    };

    html! {
        <canvas
            ref={canvas_ref}
            class={classes!("signature-canvas", props.disabled.then_some("disabled"))}
            width={CANVAS_WIDTH.to_string()}
            height={CANVAS_HEIGHT.to_string()}
            style={format!("width:{}px;height:{}px;touch-action:none;", CANVAS_WIDTH, CANVAS_HEIGHT)}
            onpointerdown={onpointerdown}
            onpointermove={onpointermove}
            onpointerup={release.clone()}
            onpointerleave={release}
        />
    }
}

fn point_of(e: &PointerEvent) -> Point {
    Point::new(e.offset_x() as f32, e.offset_y() as f32)
}

fn paint(canvas_ref: &NodeRef, strokes: &[Vec<Point>]) {
    let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() else {
        return;
    };
    let context = match canvas.get_context("2d") {
        Ok(Some(context)) => context,
        _ => {
            log::warn!("signature canvas has no 2d context");
            return;
        }
    };
    let Ok(context) = context.dyn_into::<CanvasRenderingContext2d>() else {
        return;
    };

    context.set_fill_style_str("#ffffff");
    context.fill_rect(0.0, 0.0, CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64);
    context.set_stroke_style_str(INK);
    context.set_fill_style_str(INK);
    context.set_line_width(STROKE_WIDTH as f64);
    context.set_line_cap("round");
    context.set_line_join("round");

    for stroke in strokes {
        match stroke.as_slice() {
            [] => {}
            [dot] => {
                context.begin_path();
                context
                    .arc(dot.x as f64, dot.y as f64, STROKE_WIDTH as f64 / 2.0, 0.0, 2.0 * PI)
                    .ok();
                context.fill();
            }
            [first, rest @ ..] => {
                context.begin_path();
                context.move_to(first.x as f64, first.y as f64);
                for point in rest {
                    context.line_to(point.x as f64, point.y as f64);
                }
                context.stroke();
            }
        }
    }
}
