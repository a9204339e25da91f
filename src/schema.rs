// Mirrors migrations/2024-01-01-000000_create_ecommerce_tables/up.sql

diesel::table! {
    customers (customer_id) {
        customer_id -> Text,
        name -> Text,
        email -> Text,
        country -> Text,
    }
}

diesel::table! {
    order_items (order_item_id) {
        order_item_id -> Text,
        order_id -> Text,
        product_id -> Text,
        quantity -> BigInt,
    }
}

diesel::table! {
    orders (order_id) {
        order_id -> Text,
        customer_id -> Text,
        order_date -> Text,
        total_amount -> Double,
    }
}

diesel::table! {
    payments (payment_id) {
        payment_id -> Text,
        order_id -> Text,
        payment_method -> Text,
        payment_status -> Text,
    }
}

diesel::table! {
    products (product_id) {
        product_id -> Text,
        name -> Text,
        category -> Text,
        price -> Double,
    }
}

// Query-level relations only; the store itself declares no foreign keys.
diesel::joinable!(order_items -> orders (order_id));
diesel::joinable!(order_items -> products (product_id));
diesel::joinable!(orders -> customers (customer_id));
diesel::joinable!(payments -> orders (order_id));

diesel::allow_tables_to_appear_in_same_query!(customers, order_items, orders, payments, products,);
