use crate::models::{category, customer, item, item_categories, order, order_line};
use sea_orm::*;

/// Insert the fixed demo catalogue, customers and orders.
///
/// Does nothing when the store already holds customers, so it is safe to run
/// on every startup.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    if customer::Entity::find().count(db).await? > 0 {
        tracing::info!("Data already exists, skipping demo seed");
        return Ok(());
    }

    let now = chrono::Utc::now().to_rfc3339();
    let txn = db.begin().await?;

    // 1. Categories
    let categories = [
        ("Electronics", "Gadgets and devices"),
        ("Books", "Various genres of books"),
        ("Clothing", "Men and Women apparel"),
    ];

    let mut category_ids = Vec::new();
    for (title, description) in categories {
        let model = category::ActiveModel {
            title: Set(title.to_owned()),
            description: Set(Some(description.to_owned())),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        category_ids.push(model.id);
    }
    let (electronics, books, clothing) = (category_ids[0], category_ids[1], category_ids[2]);

    // 2. Items, one of them in two categories
    let items = [
        ("Laptop", "High-performance laptop", 1200.00, vec![electronics]),
        ("Novel - The Great Gatsby", "A classic novel", 15.99, vec![books]),
        ("T-Shirt", "Cotton T-Shirt", 25.50, vec![clothing]),
        ("Smartphone", "Latest model smartphone", 800.00, vec![electronics]),
        ("Cookbook", "Recipes for everyone", 30.00, vec![books, clothing]),
    ];

    let mut item_ids = Vec::new();
    for (title, description, price, linked) in items {
        let model = item::ActiveModel {
            title: Set(title.to_owned()),
            description: Set(Some(description.to_owned())),
            price: Set(price),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for category_id in linked {
            item_categories::ActiveModel {
                item_id: Set(model.id),
                category_id: Set(category_id),
            }
            .insert(&txn)
            .await?;
        }
        item_ids.push(model.id);
    }

    // 3. Customers
    let customers = [
        ("John", "Doe", "john.doe@example.com"),
        ("Jane", "Smith", "jane.smith@example.com"),
    ];

    let mut customer_ids = Vec::new();
    for (name, surname, email) in customers {
        let model = customer::ActiveModel {
            name: Set(name.to_owned()),
            surname: Set(surname.to_owned()),
            email: Set(email.to_owned()),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        customer_ids.push(model.id);
    }

    // 4. Orders: (customer index, [(item index, quantity)])
    let orders: [(usize, &[(usize, i32)]); 3] = [
        (0, &[(0, 1), (1, 2)]),
        (1, &[(2, 3), (3, 1), (0, 1)]),
        (0, &[(4, 1)]),
    ];

    for (customer_index, lines) in orders {
        let model = order::ActiveModel {
            customer_id: Set(customer_ids[customer_index]),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for &(item_index, quantity) in lines {
            order_line::ActiveModel {
                order_id: Set(model.id),
                shop_item_id: Set(item_ids[item_index]),
                quantity: Set(quantity),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
    }

    txn.commit().await?;
    tracing::info!("Demo data seeded");
    Ok(())
}
