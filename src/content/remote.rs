//! Mapping between [`SiteContent`] and the backend's flat snake_case
//! document.

use serde_json::{Map, Value};

use crate::content::model::{PartialSiteContent, SiteContent};

/// A document field that can take a value from the backend document and
/// render itself back into it.
pub trait ContentField {
    /// Overwrite `self` from `value` when it carries a usable value.
    /// Returns whether anything was taken.
    fn absorb(&mut self, value: &Value) -> bool;

    fn to_value(&self) -> Value;
}

/// Strings only overwrite when non-empty.
impl ContentField for String {
    fn absorb(&mut self, value: &Value) -> bool {
        match value {
            Value::String(s) if !s.is_empty() => {
                *self = s.clone();
                true
            }
            _ => false,
        }
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

/// Numbers overwrite whenever present; zero is a real value.
impl ContentField for i64 {
    fn absorb(&mut self, value: &Value) -> bool {
        let parsed = match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        match parsed {
            Some(n) => {
                *self = n;
                true
            }
            None => false,
        }
    }

    fn to_value(&self) -> Value {
        Value::from(*self)
    }
}

/// Lists overwrite when non-empty. The backend stores them as a JSON-encoded
/// string, so both an array and a string holding one are accepted.
impl ContentField for Vec<String> {
    fn absorb(&mut self, value: &Value) -> bool {
        let items: Option<Vec<String>> = match value {
            Value::Array(items) => Some(
                items
                    .iter()
                    .map(|v| match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            Value::String(s) => serde_json::from_str(s).ok(),
            _ => None,
        };
        match items {
            Some(items) if !items.is_empty() => {
                *self = items;
                true
            }
            _ => false,
        }
    }

    fn to_value(&self) -> Value {
        Value::String(Value::from(self.clone()).to_string())
    }
}

macro_rules! site_fields {
    ($($section:ident { $($field:ident => $key:literal),* $(,)? })*) => {
        /// Every backend key the document maps, in section order.
        pub const FIELD_KEYS: &[&str] = &[$($($key,)*)*];

        fn merge_fields(content: &mut SiteContent, remote: &Map<String, Value>) -> usize {
            let mut applied = 0;
            $($(
                if let Some(value) = remote.get($key) {
                    if content.$section.$field.absorb(value) {
                        applied += 1;
                    }
                }
            )*)*
            applied
        }

        /// Backend payload for every section `partial` touches, taken from
        /// `content` after the patch was applied.
        pub fn to_payload(content: &SiteContent, partial: &PartialSiteContent) -> Map<String, Value> {
            let mut payload = Map::new();
            $(
                if partial.$section.as_ref().is_some_and(|p| !p.is_empty()) {
                    $( payload.insert($key.to_string(), content.$section.$field.to_value()); )*
                }
            )*
            payload
        }
    };
}

site_fields! {
    hero {
        title => "hero_title",
        subtitle => "hero_subtitle",
        description => "hero_description",
        primary_button_text => "hero_primary_button",
        secondary_button_text => "hero_secondary_button",
    }
    logo {
        text => "logo_text",
        subtitle => "logo_subtitle",
    }
    about {
        team_name => "about_team_name",
        description => "about_description",
        mission => "about_mission",
        title => "about_title",
        subtitle => "about_subtitle",
    }
    stats {
        researchers => "stats_researchers",
        publications => "stats_publications",
        awards => "stats_awards",
        events => "stats_events",
        researchers_label => "stats_researchers_label",
        publications_label => "stats_publications_label",
        awards_label => "stats_awards_label",
        events_label => "stats_events_label",
    }
    contact {
        address => "contact_address",
        phone => "contact_phone",
        email => "contact_email",
        hours => "contact_hours",
        title => "contact_title",
        subtitle => "contact_subtitle",
        form_name => "contact_form_name",
        form_email => "contact_form_email",
        form_subject => "contact_form_subject",
        form_message => "contact_form_message",
        form_send => "contact_form_send",
    }
    navigation {
        home => "nav_home",
        about => "nav_about",
        projects => "nav_projects",
        publications => "nav_publications",
        events => "nav_events",
        contact => "nav_contact",
        login => "nav_login",
        register => "nav_register",
        dashboard => "nav_dashboard",
        profile => "nav_profile",
        logout => "nav_logout",
    }
    projects {
        title => "projects_title",
        subtitle => "projects_subtitle",
        view_all => "projects_view_all",
    }
    publications {
        title => "publications_title",
        subtitle => "publications_subtitle",
        view_all => "publications_view_all",
    }
    events {
        title => "events_title",
        subtitle => "events_subtitle",
        view_all => "events_view_all",
    }
    footer {
        research_domains => "footer_research_domains",
        team_introduction => "footer_team_introduction",
        team_name => "footer_team_name",
        copyright => "footer_copyright",
        about_title => "footer_about_title",
        quick_links_title => "footer_quick_links_title",
        contact_title => "footer_contact_title",
        follow_us => "footer_follow_us",
    }
    page_titles {
        home => "page_title_home",
        about => "page_title_about",
        projects => "page_title_projects",
        publications => "page_title_publications",
        events => "page_title_events",
        contact => "page_title_contact",
        login => "page_title_login",
        register => "page_title_register",
        dashboard => "page_title_dashboard",
        profile => "page_title_profile",
        admin => "page_title_admin",
    }
    meta {
        site_title => "site_title",
        site_description => "site_description",
        site_keywords => "site_keywords",
    }
}

/// Overlay the backend document onto `content`. Fields the backend leaves
/// empty or omits keep their current value. `resolve_media` turns the
/// `logo_image` path into a fetchable URL. Returns how many fields were
/// taken from the backend.
pub fn merge_remote(
    content: &mut SiteContent,
    remote: &Map<String, Value>,
    resolve_media: impl Fn(&str) -> String,
) -> usize {
    let mut applied = merge_fields(content, remote);
    if let Some(Value::String(path)) = remote.get("logo_image") {
        if !path.is_empty() {
            content.logo.image_url = Some(resolve_media(path));
            applied += 1;
        }
    }
    applied
}
