//! The admin-editable site document and its static defaults.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroSection {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub primary_button_text: String,
    pub secondary_button_text: String,
}

impl Default for HeroSection {
    fn default() -> Self {
        Self {
            title: "Innovation & Excellence Scientifique".into(),
            subtitle: "Laboratoire de Recherche Avancée".into(),
            description: "Nous repoussons les frontières de la connaissance à travers des \
                          recherches innovantes et des collaborations interdisciplinaires de \
                          premier plan."
                .into(),
            primary_button_text: "Découvrir nos projets".into(),
            secondary_button_text: "Rejoindre l'équipe".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsSection {
    pub researchers: i64,
    pub publications: i64,
    pub awards: i64,
    pub events: i64,
    pub researchers_label: String,
    pub publications_label: String,
    pub awards_label: String,
    pub events_label: String,
}

impl Default for StatsSection {
    fn default() -> Self {
        Self {
            researchers: 28,
            publications: 156,
            awards: 15,
            events: 52,
            researchers_label: "Chercheurs".into(),
            publications_label: "Publications".into(),
            awards_label: "Prix reçus".into(),
            events_label: "Événements".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AboutSection {
    pub team_name: String,
    pub description: String,
    pub mission: String,
    pub title: String,
    pub subtitle: String,
}

impl Default for AboutSection {
    fn default() -> Self {
        Self {
            team_name: "Équipe de Recherche Excellence".into(),
            description: "Une équipe pluridisciplinaire dédiée à l'innovation scientifique"
                .into(),
            mission: "Transformer les découvertes scientifiques en solutions concrètes pour \
                      la société"
                .into(),
            title: "À propos de nous".into(),
            subtitle: "Notre équipe de recherche".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactSection {
    pub address: String,
    pub phone: String,
    pub email: String,
    pub hours: String,
    pub title: String,
    pub subtitle: String,
    pub form_name: String,
    pub form_email: String,
    pub form_subject: String,
    pub form_message: String,
    pub form_send: String,
}

impl Default for ContactSection {
    fn default() -> Self {
        Self {
            address: "123 Avenue de la Recherche, 75001 Paris, France".into(),
            phone: "+33 1 23 45 67 89".into(),
            email: "contact@research-excellence.fr".into(),
            hours: "Lundi - Vendredi: 9h00 - 18h00".into(),
            title: "Contactez-nous".into(),
            subtitle: "Nous sommes là pour vous aider".into(),
            form_name: "Nom".into(),
            form_email: "Email".into(),
            form_subject: "Sujet".into(),
            form_message: "Message".into(),
            form_send: "Envoyer le message".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogoSection {
    pub text: String,
    pub subtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Default for LogoSection {
    fn default() -> Self {
        Self {
            text: "Research Excellence".into(),
            subtitle: "Laboratoire d'Innovation".into(),
            image_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationSection {
    pub home: String,
    pub about: String,
    pub projects: String,
    pub publications: String,
    pub events: String,
    pub contact: String,
    pub login: String,
    pub register: String,
    pub dashboard: String,
    pub profile: String,
    pub logout: String,
}

impl Default for NavigationSection {
    fn default() -> Self {
        Self {
            home: "Accueil".into(),
            about: "À propos".into(),
            projects: "Projets".into(),
            publications: "Publications".into(),
            events: "Événements".into(),
            contact: "Contact".into(),
            login: "Connexion".into(),
            register: "S'inscrire".into(),
            dashboard: "Tableau de bord".into(),
            profile: "Profil".into(),
            logout: "Déconnexion".into(),
        }
    }
}

/// Heading block shared by the projects, publications and events teasers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingSection {
    pub title: String,
    pub subtitle: String,
    pub view_all: String,
}

impl Default for ListingSection {
    fn default() -> Self {
        Self::new("", "", "")
    }
}

impl ListingSection {
    fn new(title: &str, subtitle: &str, view_all: &str) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            view_all: view_all.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FooterSection {
    pub research_domains: Vec<String>,
    pub team_introduction: String,
    pub team_name: String,
    pub copyright: String,
    pub about_title: String,
    pub quick_links_title: String,
    pub contact_title: String,
    pub follow_us: String,
}

impl Default for FooterSection {
    fn default() -> Self {
        Self {
            research_domains: vec![String::new(); 5],
            team_introduction: String::new(),
            team_name: String::new(),
            copyright: String::new(),
            about_title: "À propos".into(),
            quick_links_title: "Liens rapides".into(),
            contact_title: "Contact".into(),
            follow_us: "Suivez-nous".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageTitlesSection {
    pub home: String,
    pub about: String,
    pub projects: String,
    pub publications: String,
    pub events: String,
    pub contact: String,
    pub login: String,
    pub register: String,
    pub dashboard: String,
    pub profile: String,
    pub admin: String,
}

impl Default for PageTitlesSection {
    fn default() -> Self {
        Self {
            home: "Accueil".into(),
            about: "À propos".into(),
            projects: "Projets".into(),
            publications: "Publications".into(),
            events: "Événements".into(),
            contact: "Contact".into(),
            login: "Connexion".into(),
            register: "Inscription".into(),
            dashboard: "Tableau de bord".into(),
            profile: "Profil".into(),
            admin: "Administration".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetaSection {
    pub site_title: String,
    pub site_description: String,
    pub site_keywords: String,
}

impl Default for MetaSection {
    fn default() -> Self {
        Self {
            site_title: "Laboratoire de Recherche".into(),
            site_description: "Laboratoire de recherche avancée dédié à l'innovation \
                               scientifique"
                .into(),
            site_keywords: "recherche, science, innovation, laboratoire, publications".into(),
        }
    }
}

/// Every display string and statistic the site renders, keyed by section.
///
/// Serialised camelCase; this is the shape cached under `siteContent`.
/// Unknown or missing fields in a cached copy fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteContent {
    pub hero: HeroSection,
    pub stats: StatsSection,
    pub about: AboutSection,
    pub contact: ContactSection,
    pub navigation: NavigationSection,
    pub projects: ListingSection,
    pub publications: ListingSection,
    pub events: ListingSection,
    pub footer: FooterSection,
    pub page_titles: PageTitlesSection,
    pub meta: MetaSection,
    pub logo: LogoSection,
}

impl Default for SiteContent {
    fn default() -> Self {
        Self {
            hero: HeroSection::default(),
            stats: StatsSection::default(),
            about: AboutSection::default(),
            contact: ContactSection::default(),
            navigation: NavigationSection::default(),
            projects: ListingSection::new(
                "Nos Projets",
                "Découvrez nos recherches en cours",
                "Voir tous les projets",
            ),
            publications: ListingSection::new(
                "Publications",
                "Nos dernières publications scientifiques",
                "Voir toutes les publications",
            ),
            events: ListingSection::new(
                "Événements",
                "Rejoignez-nous lors de nos événements",
                "Voir tous les événements",
            ),
            footer: FooterSection::default(),
            page_titles: PageTitlesSection::default(),
            meta: MetaSection::default(),
            logo: LogoSection::default(),
        }
    }
}

macro_rules! section_patch {
    ($(#[$doc:meta])* $patch:ident for $section:ident { $($field:ident: $ty:ty),* $(,)? }) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        pub struct $patch {
            $(
                #[serde(skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )*
        }

        impl $patch {
            pub fn is_empty(&self) -> bool {
                true $(&& self.$field.is_none())*
            }

            pub fn apply_to(&self, section: &mut $section) {
                $(
                    if let Some(value) = &self.$field {
                        section.$field = value.clone();
                    }
                )*
            }
        }
    };
}

section_patch!(HeroPatch for HeroSection {
    title: String,
    subtitle: String,
    description: String,
    primary_button_text: String,
    secondary_button_text: String,
});

section_patch!(StatsPatch for StatsSection {
    researchers: i64,
    publications: i64,
    awards: i64,
    events: i64,
    researchers_label: String,
    publications_label: String,
    awards_label: String,
    events_label: String,
});

section_patch!(AboutPatch for AboutSection {
    team_name: String,
    description: String,
    mission: String,
    title: String,
    subtitle: String,
});

section_patch!(ContactPatch for ContactSection {
    address: String,
    phone: String,
    email: String,
    hours: String,
    title: String,
    subtitle: String,
    form_name: String,
    form_email: String,
    form_subject: String,
    form_message: String,
    form_send: String,
});

section_patch!(
    /// The logo image itself travels as a separate upload.
    LogoPatch for LogoSection {
        text: String,
        subtitle: String,
    }
);

section_patch!(NavigationPatch for NavigationSection {
    home: String,
    about: String,
    projects: String,
    publications: String,
    events: String,
    contact: String,
    login: String,
    register: String,
    dashboard: String,
    profile: String,
    logout: String,
});

section_patch!(ListingPatch for ListingSection {
    title: String,
    subtitle: String,
    view_all: String,
});

section_patch!(FooterPatch for FooterSection {
    research_domains: Vec<String>,
    team_introduction: String,
    team_name: String,
    copyright: String,
    about_title: String,
    quick_links_title: String,
    contact_title: String,
    follow_us: String,
});

section_patch!(PageTitlesPatch for PageTitlesSection {
    home: String,
    about: String,
    projects: String,
    publications: String,
    events: String,
    contact: String,
    login: String,
    register: String,
    dashboard: String,
    profile: String,
    admin: String,
});

section_patch!(MetaPatch for MetaSection {
    site_title: String,
    site_description: String,
    site_keywords: String,
});

/// A field-level patch. Only the fields it names change; everything else
/// keeps its current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialSiteContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero: Option<HeroPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatsPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<AboutPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation: Option<NavigationPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<ListingPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publications: Option<ListingPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<ListingPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<FooterPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_titles: Option<PageTitlesPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<LogoPatch>,
}

macro_rules! for_each_section {
    ($m:ident) => {
        $m!(
            hero,
            stats,
            about,
            contact,
            navigation,
            projects,
            publications,
            events,
            footer,
            page_titles,
            meta,
            logo
        )
    };
}

impl PartialSiteContent {
    /// True when no section names any field.
    pub fn is_empty(&self) -> bool {
        macro_rules! all_empty {
            ($($section:ident),*) => {
                true $(&& self.$section.as_ref().map_or(true, |p| p.is_empty()))*
            };
        }
        for_each_section!(all_empty)
    }

    /// Overlay the named fields onto `content`.
    pub fn apply(&self, content: &mut SiteContent) {
        macro_rules! overlay {
            ($($section:ident),*) => {
                $(
                    if let Some(patch) = &self.$section {
                        patch.apply_to(&mut content.$section);
                    }
                )*
            };
        }
        for_each_section!(overlay);
    }
}
