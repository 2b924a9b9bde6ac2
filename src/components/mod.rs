//! UI Components
//!
//! Leptos components. Store and gateway handles are passed as props.

mod admin_users;
mod delete_confirm_button;
mod group_editor;
mod group_list;
pub mod link_preview;
mod login_form;
mod member_list;
mod public_group_list;
mod request_badge;

pub use admin_users::AdminUsers;
pub use delete_confirm_button::DeleteConfirmButton;
pub use group_editor::GroupEditor;
pub use group_list::GroupList;
pub use link_preview::LinkPreview;
pub use login_form::LoginForm;
pub use member_list::MemberList;
pub use public_group_list::PublicGroupList;
pub use request_badge::RequestBadge;
