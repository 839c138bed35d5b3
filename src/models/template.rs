//! 内置模板目录:静态数据加搜索/分类过滤。

use memchr::memmem;

#[derive(Debug, PartialEq, Eq)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub preview_image: &'static str,
    pub category: &'static str,
    pub tags: &'static [&'static str],
}

impl Template {
    /// 从模板生成的开场提示词,直接作为项目的初始需求。
    pub fn workspace_prompt(&self) -> String {
        format!(
            "Create a website using the {} template. {}",
            self.name, self.description
        )
    }
}

/// (id, 显示名)。第一项是不过滤的 "all"。
pub const CATEGORIES: &[(&str, &str)] = &[
    ("all", "All Templates"),
    ("portfolio", "Portfolio"),
    ("business", "Business"),
    ("ecommerce", "E-commerce"),
    ("blog", "Blog"),
    ("restaurant", "Restaurant"),
    ("creative", "Creative"),
    ("fitness", "Fitness"),
    ("nonprofit", "Nonprofit"),
];

pub const TEMPLATES: &[Template] = &[
    Template {
        id: "portfolio-modern",
        name: "Modern Portfolio",
        description: "Clean, minimalist portfolio perfect for designers and developers",
        preview_image:
            "https://images.unsplash.com/photo-1460925895917-afdab827c52f?w=400&h=300&fit=crop",
        category: "portfolio",
        tags: &["portfolio", "modern", "minimal", "responsive"],
    },
    Template {
        id: "ecommerce-store",
        name: "E-commerce Store",
        description: "Full-featured online store with product catalog and checkout",
        preview_image:
            "https://images.unsplash.com/photo-1556742049-0cfed4f6a45d?w=400&h=300&fit=crop",
        category: "ecommerce",
        tags: &["ecommerce", "store", "products", "shopping"],
    },
    Template {
        id: "saas-landing",
        name: "SaaS Landing Page",
        description: "Convert visitors with this high-converting SaaS landing page",
        preview_image:
            "https://images.unsplash.com/photo-1551650975-87deedd944c3?w=400&h=300&fit=crop",
        category: "business",
        tags: &["saas", "landing", "business", "conversion"],
    },
    Template {
        id: "blog-magazine",
        name: "Blog & Magazine",
        description: "Content-focused design perfect for blogs and online magazines",
        preview_image:
            "https://images.unsplash.com/photo-1486312338219-ce68e2c6b7d3?w=400&h=300&fit=crop",
        category: "blog",
        tags: &["blog", "magazine", "content", "articles"],
    },
    Template {
        id: "restaurant-menu",
        name: "Restaurant & Menu",
        description: "Appetizing design for restaurants with online menu and ordering",
        preview_image:
            "https://images.unsplash.com/photo-1414235077428-338989a2e8c0?w=400&h=300&fit=crop",
        category: "restaurant",
        tags: &["restaurant", "menu", "food", "ordering"],
    },
    Template {
        id: "photography-gallery",
        name: "Photography Gallery",
        description: "Stunning gallery layout to showcase your photography work",
        preview_image:
            "https://images.unsplash.com/photo-1452587925148-ce544e77e70d?w=400&h=300&fit=crop",
        category: "portfolio",
        tags: &["photography", "gallery", "portfolio", "visual"],
    },
    Template {
        id: "agency-corporate",
        name: "Agency & Corporate",
        description: "Professional corporate website for agencies and businesses",
        preview_image:
            "https://images.unsplash.com/photo-1497366216548-37526070297c?w=400&h=300&fit=crop",
        category: "business",
        tags: &["agency", "corporate", "business", "professional"],
    },
    Template {
        id: "fitness-gym",
        name: "Fitness & Gym",
        description: "Energetic design for fitness centers and personal trainers",
        preview_image:
            "https://images.unsplash.com/photo-1571019613454-1cb2f99b2d8b?w=400&h=300&fit=crop",
        category: "fitness",
        tags: &["fitness", "gym", "health", "training"],
    },
    Template {
        id: "music-artist",
        name: "Music & Artist",
        description: "Creative layout for musicians and artists to showcase their work",
        preview_image:
            "https://images.unsplash.com/photo-1493225457124-a3eb161ffa5f?w=400&h=300&fit=crop",
        category: "creative",
        tags: &["music", "artist", "creative", "showcase"],
    },
    Template {
        id: "nonprofit-charity",
        name: "Nonprofit & Charity",
        description: "Inspiring design for nonprofits and charitable organizations",
        preview_image:
            "https://images.unsplash.com/photo-1559027615-cd4628902d4a?w=400&h=300&fit=crop",
        category: "nonprofit",
        tags: &["nonprofit", "charity", "donation", "cause"],
    },
];

/// 搜索词对名字、描述、标签做不区分大小写的子串匹配;分类 "all" 不过滤。
/// 两个条件同时生效。
pub fn filter_templates(query: &str, category: &str) -> Vec<&'static Template> {
    let needle = query.trim().to_lowercase();
    TEMPLATES
        .iter()
        .filter(|template| category == "all" || template.category == category)
        .filter(|template| needle.is_empty() || template_matches(template, &needle))
        .collect()
}

fn template_matches(template: &Template, needle: &str) -> bool {
    let finder = memmem::Finder::new(needle.as_bytes());
    if finder.find(template.name.to_lowercase().as_bytes()).is_some() {
        return true;
    }
    if finder
        .find(template.description.to_lowercase().as_bytes())
        .is_some()
    {
        return true;
    }
    template
        .tags
        .iter()
        .any(|tag| finder.find(tag.to_lowercase().as_bytes()).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_complete() {
        assert_eq!(TEMPLATES.len(), 10);
        assert_eq!(CATEGORIES.len(), 9);
        assert_eq!(CATEGORIES[0].0, "all");
        for template in TEMPLATES {
            assert!(CATEGORIES.iter().any(|(id, _)| *id == template.category));
            assert_eq!(template.tags.len(), 4);
        }
    }

    #[test]
    fn empty_query_and_all_category_keeps_everything() {
        assert_eq!(filter_templates("", "all").len(), TEMPLATES.len());
        assert_eq!(filter_templates("   ", "all").len(), TEMPLATES.len());
    }

    #[test]
    fn query_matches_name_description_and_tags() {
        let by_name = filter_templates("Modern Port", "all");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, "portfolio-modern");

        let by_description = filter_templates("checkout", "all");
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].id, "ecommerce-store");

        let by_tag = filter_templates("conversion", "all");
        assert_eq!(by_tag.len(), 1);
        assert_eq!(by_tag[0].id, "saas-landing");
    }

    #[test]
    fn query_is_case_insensitive() {
        let hits = filter_templates("SAAS", "all");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "saas-landing");
    }

    #[test]
    fn category_narrows_results() {
        let business = filter_templates("", "business");
        let ids: Vec<&str> = business.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["saas-landing", "agency-corporate"]);

        let both = filter_templates("landing", "business");
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].id, "saas-landing");

        // 搜索词命中但分类不符时被过滤掉。
        assert!(filter_templates("landing", "portfolio").is_empty());
    }

    #[test]
    fn unmatched_query_yields_empty() {
        assert!(filter_templates("warehouse robots", "all").is_empty());
    }

    #[test]
    fn workspace_prompt_names_the_template() {
        let prompt = TEMPLATES[0].workspace_prompt();
        assert_eq!(
            prompt,
            "Create a website using the Modern Portfolio template. \
             Clean, minimalist portfolio perfect for designers and developers"
        );
    }
}
