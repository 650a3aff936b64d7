use std::path::Path;

use anyhow::{Context, Result};
use potluck_core::{Category, Difficulty, RecipeForm};

use crate::client::ApiClient;

struct SeedRecipe {
    title: &'static str,
    description: &'static str,
    difficulty: Difficulty,
    categories: &'static [Category],
    ingredients: &'static [&'static str],
    steps: &'static [&'static str],
    cooking_time: &'static str,
    servings: i32,
}

const SAMPLE_RECIPES: &[SeedRecipe] = &[
    SeedRecipe {
        title: "Classic Spaghetti Carbonara",
        description: "A rich and creamy Italian pasta dish with eggs, cheese, and pancetta.",
        difficulty: Difficulty::Medium,
        categories: &[Category::Italian, Category::Dinner],
        ingredients: &[
            "400g spaghetti",
            "200g pancetta or guanciale",
            "4 large eggs",
            "100g Pecorino Romano, freshly grated",
            "2 tsp black pepper, freshly ground",
        ],
        steps: &[
            "Cook spaghetti in salted boiling water until al dente.",
            "Fry the pancetta until crispy.",
            "Whisk eggs, cheese and pepper together.",
            "Toss the hot pasta with pancetta off the heat, then stir in the egg mixture.",
            "Loosen with pasta water and serve immediately.",
        ],
        cooking_time: "25 minutes",
        servings: 4,
    },
    SeedRecipe {
        title: "Green Curry with Vegetables",
        description: "Fragrant Thai curry with coconut milk, basil and seasonal vegetables.",
        difficulty: Difficulty::Medium,
        categories: &[Category::Thai, Category::Vegetarian, Category::Dinner],
        ingredients: &[
            "3 tbsp green curry paste",
            "400ml coconut milk",
            "1 aubergine, cubed",
            "1 red pepper, sliced",
            "Handful of Thai basil",
        ],
        steps: &[
            "Fry the curry paste in a splash of coconut milk until fragrant.",
            "Add the remaining coconut milk and vegetables.",
            "Simmer until the vegetables are tender.",
            "Stir through the basil and serve with jasmine rice.",
        ],
        cooking_time: "30 minutes",
        servings: 4,
    },
    SeedRecipe {
        title: "Overnight Oats",
        description: "No-cook breakfast prepared the night before.",
        difficulty: Difficulty::Easy,
        categories: &[Category::Breakfast, Category::Vegetarian],
        ingredients: &[
            "1 cup rolled oats",
            "1 cup milk",
            "1/2 cup yogurt",
            "1 tbsp honey",
            "Berries to serve",
        ],
        steps: &[
            "Stir oats, milk, yogurt and honey together in a jar.",
            "Refrigerate overnight.",
            "Top with berries before serving.",
        ],
        cooking_time: "5 minutes",
        servings: 2,
    },
    SeedRecipe {
        title: "Molten Chocolate Cake",
        description: "Individual chocolate cakes with a gooey centre.",
        difficulty: Difficulty::Hard,
        categories: &[Category::Dessert],
        ingredients: &[
            "115g dark chocolate",
            "115g butter",
            "2 eggs plus 2 yolks",
            "50g sugar",
            "2 tbsp flour",
        ],
        steps: &[
            "Melt chocolate and butter together.",
            "Whisk eggs, yolks and sugar until pale, then fold in the chocolate and flour.",
            "Divide between buttered ramekins.",
            "Bake at 220C for 12 minutes and turn out while hot.",
        ],
        cooking_time: "25 minutes",
        servings: 4,
    },
    SeedRecipe {
        title: "Margherita Pizza",
        description: "Thin crust pizza with tomato, mozzarella and basil.",
        difficulty: Difficulty::Medium,
        categories: &[Category::Italian, Category::Vegetarian],
        ingredients: &[
            "1 pizza dough ball",
            "100ml passata",
            "125g mozzarella",
            "Fresh basil",
            "Olive oil",
        ],
        steps: &[
            "Stretch the dough into a thin round.",
            "Spread passata and tear over the mozzarella.",
            "Bake on a very hot stone until blistered.",
            "Finish with basil and olive oil.",
        ],
        cooking_time: "20 minutes",
        servings: 2,
    },
];

impl SeedRecipe {
    fn form(&self) -> RecipeForm {
        RecipeForm {
            title: self.title.to_string(),
            description: self.description.to_string(),
            difficulty: self.difficulty,
            categories: self.categories.to_vec(),
            ingredients: self.ingredients.iter().map(|s| s.to_string()).collect(),
            steps: self.steps.iter().map(|s| s.to_string()).collect(),
            cooking_time: self.cooking_time.to_string(),
            servings: self.servings,
        }
    }
}

/// Create the sample recipes as the signed-in user. `image_dir`, when given,
/// is searched for `{slug}.{png,jpg,gif,webp}` to attach as the recipe image.
pub async fn seed(client: &ApiClient, image_dir: Option<&Path>) -> Result<()> {
    for recipe in SAMPLE_RECIPES {
        let image = match image_dir {
            Some(dir) => find_image(dir, recipe.title)?,
            None => None,
        };

        let created = client
            .create_recipe(&recipe.form(), image)
            .await
            .with_context(|| format!("Failed to create recipe: {}", recipe.title))?;
        println!("Created recipe #{}: {}", created.id, created.title);
    }

    println!("Seeded {} recipes", SAMPLE_RECIPES.len());
    Ok(())
}

fn find_image(dir: &Path, title: &str) -> Result<Option<(String, Vec<u8>)>> {
    let slug = potluck_core::slugify(title);
    for ext in ["png", "jpg", "gif", "webp"] {
        let file_name = format!("{}.{}", slug, ext);
        let path = dir.join(&file_name);
        if path.exists() {
            let data = std::fs::read(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            return Ok(Some((file_name, data)));
        }
    }
    Ok(None)
}
