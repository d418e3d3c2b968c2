use uuid::Uuid;
use yew::{html, Component, Context, Html, NodeRef, Properties};

/// Slide-down sheet hosting the application's dialogs. Visibility is driven
/// by the `show` class; see [`open_top_sheet`] and [`close_top_sheet`].
pub struct YwMaterialTopSheet {
    pub id: String,
}

#[derive(Properties, PartialEq)]
pub struct Props {
    #[prop_or_default]
    pub children: Html,
    pub node_ref: NodeRef,
    /// Render already opened, for sheets mounted only while needed.
    #[prop_or_default]
    pub open: bool,
}

impl Component for YwMaterialTopSheet {
    type Message = ();
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            id: format!("sheet-{}", Uuid::new_v4()),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let class = if ctx.props().open { "top-sheet show" } else { "top-sheet" };
        html! {
            <div class={class} id={self.id.clone()} ref={ctx.props().node_ref.clone()}>
                { ctx.props().children.clone() }
            </div>
        }
    }
}

pub fn open_top_sheet(top_sheet_ref: NodeRef) {
    set_shown(top_sheet_ref, true);
}

pub fn close_top_sheet(top_sheet_ref: NodeRef) {
    set_shown(top_sheet_ref, false);
}

fn set_shown(top_sheet_ref: NodeRef, shown: bool) {
    if let Some(top_sheet) = top_sheet_ref.cast::<web_sys::HtmlElement>() {
        // Let the sheet mount before toggling so the transition runs.
        wasm_bindgen_futures::spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(50).await;
            let classes = top_sheet.class_list();
            let result = if shown {
                classes.add_1("show")
            } else {
                classes.remove_1("show")
            };
            if let Err(err) = result {
                log::warn!("could not toggle sheet {}: {:?}", top_sheet.id(), err);
            }
        });
    }
}
