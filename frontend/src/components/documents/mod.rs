//! Documents screen: documents of one intake form, or standalone documents.
//!
//! Besides listing and category filtering it hosts the multi-document export
//! (copy counts, progress, client-side merge), the markup preview with field
//! editing, and both signature dialogs.

use yew::prelude::*;

mod export_dialog;
mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::{DocumentSource, DocumentsProps};
pub use state::DocumentsComponent;

impl Component for DocumentsComponent {
    type Message = Msg;
    type Properties = DocumentsProps;

    fn create(ctx: &Context<Self>) -> Self {
        ctx.link().send_message(Msg::Load);
        DocumentsComponent::new()
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if ctx.props().source != old_props.source {
            *self = DocumentsComponent::new();
            ctx.link().send_message(Msg::Load);
        }
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }
}
